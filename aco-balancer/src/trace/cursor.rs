//! Step-by-step replay over a decision log.

use super::{DecisionStep, StepKind};

/// What a display should show when positioned on a step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub pheromones: Vec<f64>,
    pub loads: Vec<f64>,
    /// Set on probability, selection and update steps.
    pub active_task: Option<usize>,
    /// Set on selection and update steps.
    pub active_server: Option<usize>,
}

/// Read-only cursor over a step log.
///
/// Starts before the first step (`position() == None`).  Moving past either
/// end leaves the cursor on the first or last step.
#[derive(Debug, Clone)]
pub struct StepCursor<'a> {
    steps: &'a [DecisionStep],
    position: Option<usize>,
}

impl<'a> StepCursor<'a> {
    pub fn new(steps: &'a [DecisionStep]) -> Self {
        Self {
            steps,
            position: None,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn current(&self) -> Option<&'a DecisionStep> {
        self.position.and_then(|i| self.steps.get(i))
    }

    pub fn is_at_end(&self) -> bool {
        match self.position {
            Some(i) => i + 1 >= self.steps.len(),
            None => self.steps.is_empty(),
        }
    }

    /// Moves back one step, stopping at the first.
    pub fn prev(&mut self) -> Option<&'a DecisionStep> {
        let i = self.position?;
        self.position = Some(i.saturating_sub(1));
        self.current()
    }

    /// Advances one step.  Returns `None` (and stays put) at the end.
    pub fn advance(&mut self) -> Option<&'a DecisionStep> {
        let target = self.position.map_or(0, |i| i + 1);
        if target >= self.steps.len() {
            return None;
        }
        self.position = Some(target);
        self.current()
    }

    /// Steps after the current position.
    pub fn remaining(&self) -> usize {
        self.steps.len() - self.position.map_or(0, |i| i + 1)
    }

    pub fn first(&mut self) -> Option<&'a DecisionStep> {
        self.seek(0)
    }

    pub fn last(&mut self) -> Option<&'a DecisionStep> {
        let last = self.steps.len().checked_sub(1)?;
        self.seek(last)
    }

    /// Jumps to `index`; out-of-range indices leave the cursor unchanged.
    pub fn seek(&mut self, index: usize) -> Option<&'a DecisionStep> {
        if index >= self.steps.len() {
            return None;
        }
        self.position = Some(index);
        self.current()
    }

    /// State to display at the current position.
    ///
    /// Before the first step the live vectors are shown.  A step that carries
    /// no snapshot (selection) shows the most recent snapshot before it.
    pub fn view(&self, live_pheromones: &[f64], live_loads: &[f64]) -> StepView {
        let Some(pos) = self.position else {
            return StepView {
                pheromones: live_pheromones.to_vec(),
                loads: live_loads.to_vec(),
                active_task: None,
                active_server: None,
            };
        };

        let (pheromones, loads) = self.steps[..=pos]
            .iter()
            .rev()
            .find_map(DecisionStep::snapshot)
            .unwrap_or((live_pheromones, live_loads));

        let step = &self.steps[pos];
        let active_server = match step.kind() {
            StepKind::Selection | StepKind::Update => step.selected_server(),
            _ => None,
        };

        StepView {
            pheromones: pheromones.to_vec(),
            loads: loads.to_vec(),
            active_task: step.task_index(),
            active_server,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::probability::ProbabilityBreakdown;
    use crate::task::Assignment;

    fn one_task_log() -> Vec<DecisionStep> {
        vec![
            DecisionStep::Initial {
                pheromones: vec![0.8, 0.8],
                loads: vec![0.0, 0.0],
            },
            DecisionStep::Probability {
                task: 10.0,
                task_index: 0,
                pheromones: vec![0.8, 0.8],
                loads: vec![0.0, 0.0],
                breakdown: ProbabilityBreakdown {
                    probabilities: vec![0.5, 0.5],
                    ..Default::default()
                },
            },
            DecisionStep::Selection {
                task: 10.0,
                task_index: 0,
                draw: 0.3,
                cumulative: 0.5,
                selected_server: 0,
                probabilities: vec![0.5, 0.5],
            },
            DecisionStep::Update {
                task: 10.0,
                task_index: 0,
                selected_server: 0,
                old_pheromone: 0.8,
                contribution: 10.0 / 11.0,
                new_pheromone: 0.8 + 10.0 / 11.0,
                pheromones: vec![0.8 + 10.0 / 11.0, 0.8],
                loads: vec![10.0, 0.0],
            },
            DecisionStep::Final {
                pheromones: vec![0.8 + 10.0 / 11.0, 0.8],
                loads: vec![10.0, 0.0],
                assignments: vec![Assignment::new(0, 10.0)],
            },
        ]
    }

    #[test]
    fn starts_before_first_step_showing_live_state() {
        let log = one_task_log();
        let cursor = StepCursor::new(&log);
        assert_eq!(cursor.position(), None);
        let v = cursor.view(&[9.0, 9.0], &[1.0, 1.0]);
        assert_eq!(v.pheromones, vec![9.0, 9.0]);
        assert_eq!(v.active_task, None);
    }

    #[test]
    fn walks_forward_and_stops_at_end() {
        let log = one_task_log();
        let mut c = StepCursor::new(&log);
        let kinds: Vec<StepKind> = std::iter::from_fn(|| c.advance().map(|s| s.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Initial,
                StepKind::Probability,
                StepKind::Selection,
                StepKind::Update,
                StepKind::Final
            ]
        );
        assert!(c.is_at_end());
        assert!(c.advance().is_none());
        assert_eq!(c.position(), Some(4));
    }

    #[test]
    fn prev_works_after_walking_off_the_end() {
        let log = one_task_log();
        let mut c = StepCursor::new(&log);
        assert_eq!(c.remaining(), 5);
        while c.advance().is_some() {}
        assert_eq!(c.remaining(), 0);
        assert_eq!(c.prev().map(|s| s.kind()), Some(StepKind::Update));
    }

    #[test]
    fn prev_saturates_at_first_step() {
        let log = one_task_log();
        let mut c = StepCursor::new(&log);
        assert!(c.prev().is_none(), "nothing before the start");
        c.seek(1);
        assert_eq!(c.prev().map(|s| s.kind()), Some(StepKind::Initial));
        assert_eq!(c.prev().map(|s| s.kind()), Some(StepKind::Initial));
    }

    #[test]
    fn selection_view_reuses_probability_snapshot() {
        let log = one_task_log();
        let mut c = StepCursor::new(&log);
        c.seek(2);
        let v = c.view(&[], &[]);
        assert_eq!(v.loads, vec![0.0, 0.0]);
        assert_eq!(v.active_task, Some(0));
        assert_eq!(v.active_server, Some(0));
    }

    #[test]
    fn probability_view_has_task_but_no_server() {
        let log = one_task_log();
        let mut c = StepCursor::new(&log);
        c.seek(1);
        let v = c.view(&[], &[]);
        assert_eq!(v.active_task, Some(0));
        assert_eq!(v.active_server, None);
    }

    #[test]
    fn seek_out_of_range_keeps_position() {
        let log = one_task_log();
        let mut c = StepCursor::new(&log);
        c.last();
        assert!(c.seek(99).is_none());
        assert_eq!(c.position(), Some(4));
        assert_eq!(c.first().map(|s| s.kind()), Some(StepKind::Initial));
    }

    #[test]
    fn empty_log() {
        let mut c = StepCursor::new(&[]);
        assert!(c.is_empty());
        assert!(c.is_at_end());
        assert!(c.advance().is_none());
        assert!(c.last().is_none());
    }
}
