use serde::Serialize;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

/// UI side effects a handler may request from the front end.
pub trait DashboardHost: Send {
    fn show_alert(&mut self, message: &str, kind: AlertKind);
    fn close_modal(&mut self, name: &str);
}

#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
}

/// Records requested effects so they can be returned with the response.
#[derive(Debug, Serialize, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostEffects {
    pub alerts: Vec<Alert>,
    pub closed_modals: Vec<String>,
}

impl DashboardHost for HostEffects {
    fn show_alert(&mut self, message: &str, kind: AlertKind) {
        self.alerts.push(Alert {
            message: message.to_string(),
            kind,
        });
    }

    fn close_modal(&mut self, name: &str) {
        self.closed_modals.push(name.to_string());
    }
}
