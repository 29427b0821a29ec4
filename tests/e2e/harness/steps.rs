use std::time::Duration;

use super::assertions::Assertion;

/// One complete transaction, used for concurrent replay.
#[derive(Debug, Clone)]
pub struct TxSpec {
    pub tx: String,
    pub url: String,
    pub source: Option<String>,
    pub method: String,
}

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // User actions
    UserCreateProject {
        name: String,
        scope: Vec<String>,
    },
    UserActivateProject {
        name: String,
    },
    UserCustomRequest {
        base_tx: String,
        label: String,
        method: Option<String>,
        destination: Option<String>,
    },
    UserRenamePage {
        page: String,
        nickname: String,
    },

    // Event source callbacks
    RequestStarted {
        tx: String,
        url: String,
        source: Option<String>,
        method: String,
        timestamp_ms: i64,
    },
    HeadersReady {
        tx: String,
        headers: Vec<(String, String)>,
    },
    Completed {
        tx: String,
        status_code: u16,
    },
    ReplayFixture {
        name: String,
    },
    Concurrent {
        transactions: Vec<TxSpec>,
    },

    // Time control
    Wait {
        duration: Duration,
    },

    // Failure simulation
    Crash,
    Restart,

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
