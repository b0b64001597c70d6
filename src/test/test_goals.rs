mod test {
    use crate::core::*;
    use crate::test::test_util::{assert_symbols_match, v, GridTestState};

    const SEVEN_BY_FIVE: &str = r#"
@......
..#....
.B.#...
.......
......F
"#;

    #[test]
    fn goal_cells_are_workable_cells_in_row_major_order() {
        let mut game = GridTestState::new(SEVEN_BY_FIVE);
        let goals = game.robot().find_goal_cells();

        assert_eq!(goals.len(), 31);
        assert_eq!(&goals[..3], &[v(0, 0), v(1, 0), v(2, 0)]);
        assert_eq!(goals.last(), Some(&v(5, 4)));
        assert!(!goals.contains(&v(6, 4)));

        let mut sorted = goals.clone();
        sorted.sort_by_key(|p| (p.y, p.x));
        assert_eq!(sorted, goals);

        assert_symbols_match(r#"
ooooooo
oo.oooo
o.o.ooo
ooooooo
oooooo.
"#, &game.render_where_present(&goals, 'o', '.'));
    }

    #[test]
    fn step_toward_goal_leaves_the_start_cell() {
        let mut game = GridTestState::new(SEVEN_BY_FIVE);
        let moved = game.robot().step_toward_goal();

        assert_eq!(moved, Ok(CellView { x: 1, y: 0, kind: CellType(0) }));
        assert_eq!(game.occupied_cells(), vec![v(1, 0)]);
    }

    #[test]
    fn panels_count_as_goals_too() {
        let mut game = GridTestState::new(r#"
@aap
aaaa
"#);
        game.robot().apply_cell_rule();
        game.robot().apply_cell_rule();
        assert_eq!(game.robot().find_goal_cells(), vec![v(3, 0)]);
    }

    #[test]
    fn finish_cells_are_goals_when_nothing_is_workable() {
        let mut matrix = vec![vec![2u8; 5]; 5];
        matrix[0][0] |= ROBOT_FLAG;
        matrix[4][4] = 6;
        let mut game = GridTestState::from_matrix(Theme::panel(), &matrix);

        assert_eq!(game.robot().find_goal_cells(), vec![v(4, 4)]);
    }

    #[test]
    fn every_finish_cell_is_a_goal_in_row_major_order() {
        let mut game = GridTestState::new(r#"
@aF
Faa
"#);
        game.robot().apply_cell_rule();
        game.robot().apply_cell_rule();
        assert_eq!(game.robot().find_goal_cells(), vec![v(2, 0), v(0, 1)]);
    }

    #[test]
    fn no_workable_and_no_finish_means_no_goal() {
        let mut game = GridTestState::from_matrix(Theme::panel(), &[vec![2 | ROBOT_FLAG, 3, 2]]);
        let mut robot = game.robot();

        assert!(robot.find_goal_cells().is_empty());
        assert_eq!(robot.step_toward_goal(), Err(AutoStepFailure::NoGoal));
        let report = robot.auto_step();
        assert_eq!(report.reason, Some(AutoStepFailure::NoGoal));
        assert!(!report.success);
    }

    #[test]
    fn enclosed_robot_reports_no_path_and_stays_put() {
        let mut game = GridTestState::new(r#"
#####
#@#..
#####
"#);
        let mut robot = game.robot();
        assert_eq!(robot.step_toward_goal(), Err(AutoStepFailure::NoPath));
        assert_eq!(robot.position(), v(1, 1));

        let report = robot.auto_step();
        assert_eq!(report, AutoStepReport {
            success: false,
            cell: CellView { x: 1, y: 1, kind: CellType(0) },
            reason: Some(AutoStepFailure::NoPath),
        });
        assert_eq!(game.occupied_cells(), vec![v(1, 1)]);
    }

    #[test]
    fn robot_on_only_goal_is_at_goal() {
        let mut game = GridTestState::new(r#"
@aa
"#);
        assert_eq!(game.robot().step_toward_goal(), Err(AutoStepFailure::AtGoal));

        let mut finished = GridTestState::from_matrix(Theme::panel(), &[vec![2, 6 | ROBOT_FLAG]]);
        assert_eq!(finished.robot().step_toward_goal(), Err(AutoStepFailure::AtGoal));
    }

    #[test]
    fn repeated_auto_steps_reach_the_goal() {
        let mut game = GridTestState::new(r#"
@aaa
###a
aaaa
.aaa
"#);
        let mut robot = game.robot();
        // work the start cell so the far corner is the only goal left
        robot.apply_cell_rule();
        robot.apply_cell_rule();

        let mut visited = vec![];
        while let Ok(cell) = robot.step_toward_goal() {
            visited.push(cell.position());
            if cell.position() == v(0, 3) {
                break;
            }
        }
        assert_eq!(visited.last(), Some(&v(0, 3)));
        assert_eq!(visited.len(), 7);
    }

    #[test]
    fn auto_step_report_serializes_reason_in_kebab_case() {
        let report = AutoStepReport {
            success: false,
            cell: CellView { x: 1, y: 2, kind: CellType(4) },
            reason: Some(AutoStepFailure::NoPath),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"success":false,"cell":{"x":1,"y":2,"type":4},"reason":"no-path"}"#);

        let ok = AutoStepReport { reason: None, success: true, ..report };
        let json = serde_json::to_string(&ok).unwrap();
        assert!(!json.contains("reason"));
    }
}
