/// Classification of where an error is handled.
///
/// # Behavior Summary
///
/// | Scope | Aborts the run? | Logged by the aggregator? |
/// |-------|-----------------|---------------------------|
/// | `Source` | No, the source is dropped from the snapshot | Yes |
/// | `Run` | Yes, returned to the caller | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureScope {
    /// Broken markup, network trouble, bad numbers or a hung adapter.
    /// Contained to the one source that raised it.
    Source,

    /// Misconfiguration, such as an unknown country.
    /// Nothing can be collected, so the caller has to see it.
    Run,
}
