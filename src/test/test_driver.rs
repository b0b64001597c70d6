mod test {
    use crate::console_interface::parse_level;
    use crate::core::*;
    use crate::driver::{RunOutcome, Session, SessionStats, TickOutcome};
    use crate::test::test_util::v;

    fn session(level: &str) -> Session {
        let theme = Theme::panel();
        let matrix = parse_level(&theme, level).expect("test level parses");
        Session::new(theme, matrix).expect("test level builds")
    }

    #[test]
    fn tick_works_cell_before_moving() {
        let mut session = session("@.F");

        assert_eq!(session.tick(), TickOutcome::Worked(CellView { x: 0, y: 0, kind: CellType(1) }));
        assert_eq!(session.tick(), TickOutcome::Worked(CellView { x: 0, y: 0, kind: CellType(2) }));
        assert_eq!(session.tick(), TickOutcome::Moved(CellView { x: 1, y: 0, kind: CellType(0) }));
        assert_eq!(session.robot_position(), v(1, 0));
    }

    #[test]
    fn run_reaches_finish_after_working_every_cell() {
        let mut session = session("@.F");
        let mut frames = 0;
        let outcome = session.run(100, &mut |_: &[Vec<CellSnapshot>], _: Vec2| frames += 1);

        assert_eq!(outcome, RunOutcome::Finished { ticks: 7 });
        assert_eq!(frames, 7);
        assert_eq!(session.stats(), SessionStats { ticks: 7, moves: 2, rejected_moves: 0, cells_worked: 4 });
        assert_eq!(session.robot_position(), v(2, 0));
        assert_eq!(session.grid().to_matrix(), vec![vec![2, 2, 6 | ROBOT_FLAG]]);
    }

    #[test]
    fn run_stalls_when_finish_is_walled_off() {
        let mut session = session("@#F");
        let outcome = session.run(100, &mut |_: &[Vec<CellSnapshot>], _: Vec2| {});

        assert_eq!(outcome, RunOutcome::Stalled { ticks: 3, reason: AutoStepFailure::NoPath });
        assert_eq!(session.robot_position(), v(0, 0));
    }

    #[test]
    fn run_stops_at_tick_limit() {
        let mut session = session("@.F");
        let outcome = session.run(2, &mut |_: &[Vec<CellSnapshot>], _: Vec2| {});

        assert_eq!(outcome, RunOutcome::TickLimit { ticks: 2 });
        assert_eq!(session.stats().ticks, 2);
        assert!(!session.tick().is_terminal());
    }

    #[test]
    fn renderer_sees_the_robot_after_each_tick() {
        let mut session = session("@.F");
        let mut positions = vec![];
        session.run(100, &mut |snapshot: &[Vec<CellSnapshot>], robot: Vec2| {
            assert!(snapshot[robot.y as usize][robot.x as usize].occupied);
            positions.push(robot);
        });

        assert_eq!(
            positions,
            vec![v(0, 0), v(0, 0), v(1, 0), v(1, 0), v(1, 0), v(2, 0), v(2, 0)]
        );
    }

    #[test]
    fn manual_steps_count_moves_and_rejections() {
        let mut session = session(r#"
@.
#.
"#);
        assert!(session.step(Direction::Right).success);
        assert!(!session.step(Direction::Right).success);
        assert!(session.step(Direction::Forward).success);
        assert!(!session.step(Direction::Left).success);

        let stats = session.stats();
        assert_eq!(stats.moves, 2);
        assert_eq!(stats.rejected_moves, 2);
        assert_eq!(stats.ticks, 0);
        assert_eq!(session.robot_position(), v(1, 1));
    }

    #[test]
    fn reset_restores_layout_and_counters() {
        let mut session = session("@.F");
        session.run(5, &mut |_: &[Vec<CellSnapshot>], _: Vec2| {});
        assert_ne!(session.stats(), SessionStats::default());

        session.reset().unwrap();
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(session.grid().to_matrix(), vec![vec![ROBOT_FLAG, 0, 6]]);
        assert_eq!(session.robot_position(), v(0, 0));
    }

    #[test]
    fn session_places_robot_when_nothing_flagged() {
        let session = Session::new(Theme::panel(), vec![vec![0, 0], vec![0, 6]]).unwrap();
        assert_eq!(session.robot_position(), DEFAULT_START);
        assert!(session.grid()[DEFAULT_START].occupied);
    }

    #[test]
    fn session_rejects_ragged_layout() {
        let result = Session::new(Theme::panel(), vec![vec![0, 0], vec![0]]);
        assert_eq!(result.err(), Some(GridError::Ragged { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn auto_step_and_rule_update_counters() {
        let mut session = session("@..");
        assert!(session.apply_cell_rule());
        assert!(session.apply_cell_rule());
        assert!(!session.apply_cell_rule());

        let report = session.auto_step();
        assert!(report.success);
        assert_eq!(report.cell.position(), v(1, 0));
        assert_eq!(session.stats().moves, 1);
        assert_eq!(session.stats().cells_worked, 2);
    }

    #[test]
    fn state_serializes_robot_and_cells() {
        let session = session("@F");
        let state = session.state();
        assert_eq!(state.cell_type, "Floor");

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["theme"], "panel");
        assert_eq!(json["robot_position"], serde_json::json!({ "x": 0, "y": 0 }));
        assert_eq!(json["cells"][0][1], serde_json::json!({ "type": 6, "occupied": false }));
        assert_eq!(json["stats"]["ticks"], 0);
    }
}
