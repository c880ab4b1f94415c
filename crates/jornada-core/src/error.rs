use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("progress percent {0} is outside 0..=100")]
    PercentOutOfRange(u8),

    #[error("current step {current} exceeds number of steps {total}")]
    StepOutOfRange { current: u32, total: u32 },
}
