use life_grid::Loc;
use std::time::Duration;

/// Input after the front end has normalized it. Pointer clicks already carry
/// grid coordinates, never pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Escape,
    Advance,
    Randomize,
    ClearBoard,
    SpeedUp,
    SpeedDown,
    PointerClick(Loc),
    Tick(Duration),
}
