use crate::amf::Movement;
use crate::error::Result;
use crate::network::Network;
use crate::types::{CellId, Imsi, Position, SessionId, SessionType};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    Attach { imsi: Imsi, cell: CellId },
    Detach { imsi: Imsi },
    Move { imsi: Imsi, x: f64, y: f64 },
    Establish { imsi: Imsi, session_type: SessionType },
    Terminate { session: SessionId },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Attach { imsi, cell } => write!(f, "attach {} to {}", imsi, cell),
            Step::Detach { imsi } => write!(f, "detach {}", imsi),
            Step::Move { imsi, x, y } => write!(f, "move {} to ({:.0}, {:.0})", imsi, x, y),
            Step::Establish { imsi, session_type } => write!(f, "establish {} session for {}", session_type, imsi),
            Step::Terminate { session } => write!(f, "terminate session {}", session),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    pub result: Result<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
    pub outcomes: Vec<StepOutcome>,
}

impl ScenarioReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.result, Err(e) if !e.is_defect()))
            .count()
    }

    pub fn defects(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.result, Err(e) if e.is_defect()))
            .count()
    }
}

pub fn run(network: &Network, steps: &[Step]) -> ScenarioReport {
    let mut report = ScenarioReport::default();

    for (index, step) in steps.iter().enumerate() {
        let result = execute(network, step);
        match &result {
            Ok(summary) => info!("[step {}] {}: {}", index + 1, step, summary),
            Err(e) if e.is_defect() => error!("[step {}] {}: DEFECT: {}", index + 1, step, e),
            Err(e) => warn!("[step {}] {}: rejected: {}", index + 1, step, e),
        }
        report.outcomes.push(StepOutcome {
            step: step.clone(),
            result,
        });
    }

    report
}

fn execute(network: &Network, step: &Step) -> Result<String> {
    match step {
        Step::Attach { imsi, cell } => {
            network.attach(imsi, *cell)?;
            Ok(format!("connected to {}", cell))
        }
        Step::Detach { imsi } => {
            let cell = network.detach(imsi)?;
            Ok(format!("disconnected from {}", cell))
        }
        Step::Move { imsi, x, y } => {
            let summary = match network.move_device(imsi, Position::new(*x, *y))? {
                Movement::Unregistered => "moved (not registered)".to_string(),
                Movement::InRange(cell) => format!("still connected to {}", cell),
                Movement::HandedOver { from, to } => format!("handover {} -> {}", from, to),
            };
            Ok(summary)
        }
        Step::Establish { imsi, session_type } => {
            let session = network.establish_session(imsi, *session_type)?;
            Ok(format!(
                "session {} established ({} Mbps, {}ms latency)",
                session.id, session.qos.max_bit_rate, session.qos.latency_budget_ms
            ))
        }
        Step::Terminate { session } => {
            network.terminate_session(*session)?;
            Ok(format!("session {} terminated", session))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{SubscriberRecord, SubscriptionStatus};
    use std::collections::HashSet;

    const UE: &str = "001010000000001";

    fn network() -> Network {
        let network = Network::from_sources(&vec![SubscriberRecord::new(
            Imsi::from(UE),
            SubscriptionStatus::Active,
            50,
        )])
        .unwrap();
        let allowed: HashSet<Imsi> = [Imsi::from(UE)].into_iter().collect();
        network.add_cell(Position::new(100.0, 100.0), 50.0, 3, &allowed).unwrap();
        network.add_cell(Position::new(200.0, 200.0), 50.0, 3, &allowed).unwrap();
        network.add_device(Imsi::from(UE), Position::new(110.0, 110.0));
        network
    }

    fn steps(yaml: &str) -> Vec<Step> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let parsed = steps(
            r#"
- { action: attach, imsi: "001", cell: 2 }
- { action: detach, imsi: "001" }
- { action: move, imsi: "001", x: 1.5, y: 2 }
- { action: establish, imsi: "001", session_type: WebBrowsing }
- { action: terminate, session: 4 }
"#,
        );
        assert_eq!(parsed[0], Step::Attach { imsi: Imsi::from("001"), cell: CellId(2) });
        assert_eq!(parsed[2], Step::Move { imsi: Imsi::from("001"), x: 1.5, y: 2.0 });
        assert_eq!(parsed[4], Step::Terminate { session: SessionId(4) });
    }

    #[test]
    fn test_run_walkthrough() {
        let network = network();
        let report = run(
            &network,
            &steps(
                r#"
- { action: attach, imsi: "001010000000001", cell: 1 }
- { action: establish, imsi: "001010000000001", session_type: VideoStream }
- { action: establish, imsi: "001010000000001", session_type: WebBrowsing }
- { action: move, imsi: "001010000000001", x: 180, y: 180 }
- { action: move, imsi: "001010000000001", x: 500, y: 500 }
- { action: terminate, session: 1 }
"#,
            ),
        );

        assert_eq!(report.outcomes.len(), 6);
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.rejected(), 2);
        assert_eq!(report.defects(), 0);
        assert!(matches!(
            report.outcomes[2].result,
            Err(CoreError::QuotaExceeded { .. })
        ));
        assert_eq!(
            report.outcomes[3].result.as_deref(),
            Ok("handover gNodeB-1 -> gNodeB-2")
        );
        assert!(network.sessions().is_empty());
    }

    #[test]
    fn test_step_display() {
        let step = Step::Move { imsi: Imsi::from("001"), x: 180.0, y: 180.0 };
        assert_eq!(step.to_string(), "move 001 to (180, 180)");
    }
}
