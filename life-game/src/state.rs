#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AppState {
    #[default]
    Menu,
    Controls,
    Setup,
    Running,
    Paused,
    GameOver,
}

impl AppState {
    pub const ALL: [AppState; 6] = [
        AppState::Menu,
        AppState::Controls,
        AppState::Setup,
        AppState::Running,
        AppState::Paused,
        AppState::GameOver,
    ];

    /// States in which the board can be edited and the speed changed.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            AppState::Setup | AppState::Running | AppState::Paused
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            AppState::Menu => "menu",
            AppState::Controls => "controls",
            AppState::Setup => "setup",
            AppState::Running => "running",
            AppState::Paused => "paused",
            AppState::GameOver => "game over",
        }
    }
}
