//! End-to-end scenarios through the public API.

use aco_balancer::config::AcoParams;
use aco_balancer::scheduler::{BatchScheduler, FixedDraws, SchedulerError, SeededDraws};
use aco_balancer::state::SimulationState;
use aco_balancer::task::{Assignment, TaskBatch};
use aco_balancer::trace::{StepCursor, StepKind};

fn setup(servers: usize) -> (BatchScheduler, SimulationState) {
    let params = AcoParams::default();
    let state = SimulationState::with_servers(servers, &params).unwrap();
    (BatchScheduler::new(params), state)
}

#[test]
fn single_task_on_two_servers() {
    let (sched, mut state) = setup(2);
    sched
        .distribute(&mut state, &TaskBatch::new(vec![10.0]), &mut FixedDraws::new(vec![0.3]))
        .unwrap();

    assert_eq!(state.loads(), vec![10.0, 0.0]);
    let ph = state.pheromones();
    assert!((ph[0] - (0.8 + 10.0 / 11.0)).abs() < 1e-12);
    assert!((ph[1] - 0.8).abs() < 1e-12);
    assert_eq!(state.assignments(), vec![Assignment::new(0, 10.0)]);
}

#[test]
fn greedy_first_order_regardless_of_input() {
    for input in [vec![5.0, 20.0, 9.0], vec![9.0, 5.0, 20.0], vec![20.0, 9.0, 5.0]] {
        let (sched, mut state) = setup(3);
        let pass = sched
            .distribute(&mut state, &TaskBatch::new(input), &mut SeededDraws::new(1))
            .unwrap();
        let order: Vec<f64> = pass.assignments.iter().map(|a| a.task).collect();
        assert_eq!(order, vec![20.0, 9.0, 5.0]);
    }
}

#[test]
fn resize_three_to_five_leaves_no_residue() {
    let params = AcoParams::default();
    let (sched, mut state) = setup(3);
    let mut draws = SeededDraws::new(17);
    for _ in 0..4 {
        let batch = TaskBatch::generate(&params, &mut draws).unwrap();
        sched.distribute(&mut state, &batch, &mut draws).unwrap();
    }
    assert!(state.loads().iter().any(|&l| l > 0.0));

    state.resize(5).unwrap();

    assert_eq!(state.pheromones(), vec![params.initial_pheromone; 5]);
    assert_eq!(state.loads(), vec![0.0; 5]);
    assert!(state.assignments().is_empty());
    assert!(state.steps().is_empty());
}

#[test]
fn empty_batch_is_invalid_and_changes_nothing() {
    let (sched, mut state) = setup(3);
    sched
        .distribute(&mut state, &TaskBatch::new(vec![12.0, 7.0]), &mut SeededDraws::new(2))
        .unwrap();
    let before = state.snapshot();
    let steps_before = state.steps();

    let err = sched
        .distribute(&mut state, &TaskBatch::new(Vec::<f64>::new()), &mut SeededDraws::new(2))
        .unwrap_err();

    assert!(matches!(err, SchedulerError::InvalidBatch { .. }));
    assert_eq!(state.snapshot(), before);
    assert_eq!(state.steps(), steps_before);
}

#[test]
fn replaying_a_pass_step_by_step() {
    let (sched, mut state) = setup(3);
    sched
        .distribute(
            &mut state,
            &TaskBatch::new(vec![8.0, 15.0]),
            &mut FixedDraws::new(vec![0.1, 0.95]),
        )
        .unwrap();

    let steps = state.steps();
    let mut cursor = StepCursor::new(&steps);
    let mut views = Vec::new();
    while let Some(step) = cursor.advance() {
        views.push((step.kind(), cursor.view(&state.pheromones(), &state.loads())));
    }

    assert_eq!(views.len(), 8);
    // first task (15) lands on server 0 with draw 0.1
    let (kind, view) = &views[3];
    assert_eq!(*kind, StepKind::Update);
    assert_eq!(view.active_task, Some(0));
    assert_eq!(view.active_server, Some(0));
    assert_eq!(view.loads, vec![15.0, 0.0, 0.0]);

    let (kind, view) = views.last().unwrap();
    assert_eq!(*kind, StepKind::Final);
    assert_eq!(view.loads, state.loads());
    assert_eq!(view.active_task, None);
}
