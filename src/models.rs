use crate::core::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserAction {
    Move(Direction),
    ApplyRule,
    AutoStep,
    ToggleAutoRun,
    Reset,
}

pub struct ConsoleRenderState {
    pub auto_run: bool,
    pub message: Option<String>,
    pub done: bool,
}
