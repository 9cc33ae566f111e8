/// One timing block from a benchmark log: core count plus the reported
/// `[init, prep, solve]` wall times in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveSample {
    pub cores: u32,
    pub init: f64,
    pub prep: f64,
    pub solve: f64,
}
