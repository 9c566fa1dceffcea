//! Terminal vs CI runner detection for download progress

use std::io::IsTerminal;

/// Variables set by the CI systems Gradle is commonly provisioned on
const RUNNER_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// Decides whether downloads draw a live progress bar
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    progress_bars: bool,
}

impl UiContext {
    /// Progress bars only when stderr is a terminal outside a CI runner
    pub fn detect() -> Self {
        let on_runner = runner_detected(|name| std::env::var_os(name).is_some());
        Self {
            progress_bars: std::io::stderr().is_terminal() && !on_runner,
        }
    }

    /// Plain log output only
    pub fn non_interactive() -> Self {
        Self {
            progress_bars: false,
        }
    }

    pub fn use_fancy_output(&self) -> bool {
        self.progress_bars
    }
}

fn runner_detected(is_set: impl Fn(&str) -> bool) -> bool {
    RUNNER_VARS.iter().any(|name| is_set(name))
}
