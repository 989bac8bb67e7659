//! Assertions on commit outcomes
//!
//! A rejected commit is the expected result in some scenarios, so the
//! commit step returns a [`RunReport`] and the scenario states what it
//! expects with one of these assertions.

use guard_vcs::RunReport;

pub trait CommitExpectations {
    /// Panic unless the commit went through.
    fn assert_accepted(&self);

    /// Panic unless the commit was blocked.
    fn assert_rejected(&self);

    /// Panic unless the commit was blocked and its output mentions `needle`.
    fn assert_rejected_with(&self, needle: &str);
}

impl CommitExpectations for RunReport {
    #[track_caller]
    fn assert_accepted(&self) {
        if let Some(err) = self.error() {
            panic!(
                "Expected commit to be accepted, but it was rejected: {err}\nstdout:\n{}\nstderr:\n{}",
                self.stdout, self.stderr
            );
        }
    }

    #[track_caller]
    fn assert_rejected(&self) {
        assert!(
            self.error().is_some(),
            "Expected commit to be rejected, but `{}` succeeded.\nstdout:\n{}",
            self.command,
            self.stdout
        );
    }

    #[track_caller]
    fn assert_rejected_with(&self, needle: &str) {
        self.assert_rejected();
        let output = self.output();
        assert!(
            output.contains(needle),
            "Rejected commit output does not contain expected text.\nExpected: {}\nActual: {}",
            needle,
            output
        );
    }
}
