use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid game settings: {0}")]
    Config(String),
    #[error("Could not parse settings file")]
    ConfigParse(#[from] serde_json::Error),
    #[error("The display backend could not be initialized: {0}")]
    Backend(String),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}
