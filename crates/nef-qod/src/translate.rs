use nef_common::{QodSessionRequest, SmPolicyContextData};

use crate::policy::PolicyCatalog;

/// Maps inbound QoD requests onto policy contexts.
#[derive(Debug, Clone)]
pub struct RequestTranslator {
    catalog: PolicyCatalog,
    notification_uri: String,
}

impl RequestTranslator {
    pub fn new(catalog: PolicyCatalog, notification_uri: String) -> Self {
        Self {
            catalog,
            notification_uri,
        }
    }

    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    /// Pure and total: the output depends only on `req` and the catalog.
    pub fn translate(&self, req: &QodSessionRequest) -> SmPolicyContextData {
        let defaults = self.catalog.for_profile(&req.qos_profile);

        let mut ctx = SmPolicyContextData::new(
            req.device.network_access_identifier.clone(),
            defaults.pdu_session_id,
            defaults.dnn.clone(),
            defaults.snssai.clone(),
            self.notification_uri.clone(),
            defaults.pdu_session_type,
            defaults.access_type,
        );

        ctx.ipv4_address = req
            .application_server
            .ipv4_address
            .clone()
            .filter(|a| !a.is_empty());
        ctx.subscribed_session_ambr = defaults.session_ambr.clone();
        ctx.subscribed_default_qos = defaults.default_qos.clone();
        ctx.ue_location = defaults.location.clone();
        ctx
    }
}
