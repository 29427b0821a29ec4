use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::{ScenarioStep, TxSpec};
use anyhow::Result;
use std::collections::HashMap;
use std::time::Duration;
use wam_core::{RequestId, WamRepo};

/// Fluent DSL for building test scenarios
pub struct Scenario {
    name: String,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
        }
    }

    // ===== User actions =====

    /// User creates a project, which becomes active
    pub fn user_creates_project(mut self, name: &str) -> Self {
        self.steps.push(ScenarioStep::UserCreateProject {
            name: name.to_string(),
            scope: Vec::new(),
        });
        self
    }

    /// User creates a project limited to the given URL prefixes
    pub fn user_creates_scoped_project(mut self, name: &str, scope: &[&str]) -> Self {
        self.steps.push(ScenarioStep::UserCreateProject {
            name: name.to_string(),
            scope: scope.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// User switches the capture target
    pub fn user_activates(mut self, name: &str) -> Self {
        self.steps.push(ScenarioStep::UserActivateProject {
            name: name.to_string(),
        });
        self
    }

    /// User replays the request captured by `base_tx`, unchanged
    pub fn user_replays(mut self, base_tx: &str, label: &str) -> Self {
        self.steps.push(ScenarioStep::UserCustomRequest {
            base_tx: base_tx.to_string(),
            label: label.to_string(),
            method: None,
            destination: None,
        });
        self
    }

    /// User sends a modified copy of the request captured by `base_tx`
    pub fn user_sends_custom(
        mut self,
        base_tx: &str,
        label: &str,
        method: Option<&str>,
        destination: Option<&str>,
    ) -> Self {
        self.steps.push(ScenarioStep::UserCustomRequest {
            base_tx: base_tx.to_string(),
            label: label.to_string(),
            method: method.map(str::to_string),
            destination: destination.map(str::to_string),
        });
        self
    }

    /// User gives a page a nickname
    pub fn user_renames_page(mut self, page: &str, nickname: &str) -> Self {
        self.steps.push(ScenarioStep::UserRenamePage {
            page: page.to_string(),
            nickname: nickname.to_string(),
        });
        self
    }

    // ===== Event source =====

    /// Start phase of a GET
    pub fn start(self, tx: &str, url: &str, source: Option<&str>) -> Self {
        self.start_method(tx, "GET", url, source)
    }

    /// Start phase with an explicit method
    pub fn start_method(mut self, tx: &str, method: &str, url: &str, source: Option<&str>) -> Self {
        let timestamp_ms = self.steps.len() as i64;
        self.steps.push(ScenarioStep::RequestStarted {
            tx: tx.to_string(),
            url: url.to_string(),
            source: source.map(str::to_string),
            method: method.to_string(),
            timestamp_ms,
        });
        self
    }

    /// Headers phase
    pub fn headers(mut self, tx: &str, headers: &[(&str, &str)]) -> Self {
        self.steps.push(ScenarioStep::HeadersReady {
            tx: tx.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        });
        self
    }

    /// Completed phase
    pub fn complete(mut self, tx: &str, status_code: u16) -> Self {
        self.steps.push(ScenarioStep::Completed {
            tx: tx.to_string(),
            status_code,
        });
        self
    }

    /// All three phases of a GET, in order
    pub fn transaction(self, tx: &str, url: &str, source: Option<&str>) -> Self {
        self.start(tx, url, source)
            .headers(tx, &[("Accept", "*/*")])
            .complete(tx, 200)
    }

    /// Replay `fixtures/<name>.jsonl` through the correlator
    pub fn replay_fixture(mut self, name: &str) -> Self {
        self.steps.push(ScenarioStep::ReplayFixture {
            name: name.to_string(),
        });
        self
    }

    /// Run complete GET transactions on separate threads.
    /// Each entry is `(tx, url, source)`.
    pub fn concurrently(mut self, transactions: &[(&str, &str, Option<&str>)]) -> Self {
        self.steps.push(ScenarioStep::Concurrent {
            transactions: transactions
                .iter()
                .map(|(tx, url, source)| TxSpec {
                    tx: tx.to_string(),
                    url: url.to_string(),
                    source: source.map(str::to_string),
                    method: "GET".to_string(),
                })
                .collect(),
        });
        self
    }

    // ===== Time control =====

    /// Advance the mock clock
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(ScenarioStep::Wait { duration });
        self
    }

    // ===== Failure simulation =====

    /// Simulate a crash
    pub fn crash(mut self) -> Self {
        self.steps.push(ScenarioStep::Crash);
        self
    }

    /// Reopen the repository from disk
    pub fn restart(mut self) -> Self {
        self.steps.push(ScenarioStep::Restart);
        self
    }

    // ===== Assertions =====

    /// Add a custom assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Add an assertion written as a closure
    pub fn assert_with(
        self,
        check: impl Fn(&WamRepo, &HashMap<String, RequestId>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.assert(Assertion::Custom(Box::new(check)))
    }

    /// Assert the active project
    pub fn assert_active(self, name: Option<&str>) -> Self {
        self.assert(Assertion::ActiveProject(name.map(str::to_string)))
    }

    /// Assert a project's exact page list, in order
    pub fn assert_project_pages(self, project: &str, pages: &[&str]) -> Self {
        self.assert(Assertion::ProjectPages {
            project: project.to_string(),
            pages: pages.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Assert how many pages a project lists
    pub fn assert_project_page_count(self, project: &str, count: usize) -> Self {
        self.assert(Assertion::ProjectPageCount {
            project: project.to_string(),
            count,
        })
    }

    /// Assert a page record exists
    pub fn assert_page_exists(self, page: &str) -> Self {
        self.assert(Assertion::PageExists(page.to_string()))
    }

    /// Assert no page record exists
    pub fn assert_no_page(self, page: &str) -> Self {
        self.assert(Assertion::NoPage(page.to_string()))
    }

    /// Assert how many requests a page lists
    pub fn assert_page_request_count(self, page: &str, count: usize) -> Self {
        self.assert(Assertion::PageRequestCount {
            page: page.to_string(),
            count,
        })
    }

    /// Assert a page lists exactly the requests from these transactions, in order
    pub fn assert_page_requests(self, page: &str, txs: &[&str]) -> Self {
        self.assert(Assertion::PageRequests {
            page: page.to_string(),
            txs: txs.iter().map(|t| t.to_string()).collect(),
        })
    }

    /// Assert a page's nickname
    pub fn assert_page_nickname(self, page: &str, nickname: &str) -> Self {
        self.assert(Assertion::PageNickname {
            page: page.to_string(),
            nickname: nickname.to_string(),
        })
    }

    /// Assert the request from `tx` is stored
    pub fn assert_request_stored(self, tx: &str) -> Self {
        self.assert(Assertion::RequestStored { tx: tx.to_string() })
    }

    /// Assert the request from `tx` was deleted
    pub fn assert_request_deleted(self, tx: &str) -> Self {
        self.assert(Assertion::RequestDeleted { tx: tx.to_string() })
    }

    /// Assert the request recorded under `label` is custom
    pub fn assert_custom(self, label: &str) -> Self {
        self.assert(Assertion::RequestIsCustom {
            tx: label.to_string(),
        })
    }

    /// Assert `tx` never produced a finalized request
    pub fn assert_not_finalized(self, tx: &str) -> Self {
        self.assert(Assertion::NotFinalized { tx: tx.to_string() })
    }

    /// Assert a builder is still pending for `tx`
    pub fn assert_builder_pending(self, tx: &str) -> Self {
        self.assert(Assertion::BuilderPending { tx: tx.to_string() })
    }

    /// Assert no transaction is left half-finished
    pub fn assert_no_builders(self) -> Self {
        self.assert(Assertion::NoBuilders)
    }

    // ===== Execution =====

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner = match ScenarioRunner::new() {
            Ok(r) => r,
            Err(e) => {
                return ScenarioResult {
                    name: self.name.clone(),
                    success: false,
                    steps_executed: 0,
                    failure_step: Some(0),
                    error: Some(format!("Failed to create runner: {}", e)),
                }
            }
        };

        match runner.execute(&self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: self.steps.len(),
                failure_step: None,
                error: None,
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
