#![forbid(unsafe_code)]

//! Built-in demo session: an agent logging in to a storefront.

use simplay::{ActionKind, ActionSequence, Bounds, SequenceBuilder, SequenceError};

/// The login-flow sequence shipped with the demo (1280x720 viewport).
pub fn login_flow() -> Result<ActionSequence, SequenceError> {
    SequenceBuilder::new()
        .push_with_id("open-home", ActionKind::Navigate, 900.0, "Open the storefront home page")
        .thinking("Start from the landing page like a new visitor")
        .gap(300.0)
        .push_with_id("hover-account", ActionKind::Hover, 600.0, "Hover the account menu")
        .at(1160.0, 48.0)
        .on("nav .account")
        .bounds(Bounds::new(1120.0, 32.0, 80.0, 32.0))
        .push_with_id("open-login", ActionKind::Click, 400.0, "Click \"Sign in\"")
        .at(1152.0, 96.0)
        .on("a[href='/login']")
        .bounds(Bounds::new(1100.0, 80.0, 104.0, 32.0))
        .thinking("The sign-in link should be reachable from the account menu")
        .gap(500.0)
        .push_with_id("focus-email", ActionKind::Click, 300.0, "Focus the email field")
        .at(640.0, 300.0)
        .on("#email")
        .bounds(Bounds::new(480.0, 284.0, 320.0, 36.0))
        .push_with_id("type-email", ActionKind::Type, 1400.0, "Type qa.agent@example.com")
        .at(640.0, 300.0)
        .on("#email")
        .bounds(Bounds::new(480.0, 284.0, 320.0, 36.0))
        .push_with_id("focus-password", ActionKind::Click, 300.0, "Focus the password field")
        .at(640.0, 356.0)
        .on("#password")
        .bounds(Bounds::new(480.0, 340.0, 320.0, 36.0))
        .push_with_id("type-password", ActionKind::Type, 1000.0, "Type the password")
        .at(640.0, 356.0)
        .on("#password")
        .bounds(Bounds::new(480.0, 340.0, 320.0, 36.0))
        .thinking("Password input must mask characters")
        .gap(200.0)
        .push_with_id("submit", ActionKind::DoubleClick, 500.0, "Double-click \"Sign in\"")
        .at(640.0, 420.0)
        .on("button[type=submit]")
        .bounds(Bounds::new(560.0, 400.0, 160.0, 40.0))
        .thinking("A double submit must not create two sessions")
        .push_with_id("wait-dashboard", ActionKind::Wait, 1200.0, "Wait for the dashboard")
        .push_with_id("scroll-orders", ActionKind::Scroll, 800.0, "Scroll to recent orders")
        .at(640.0, 560.0)
        .push_with_id("capture", ActionKind::Screenshot, 400.0, "Capture the dashboard")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_valid_and_covers_every_kind() {
        let seq = login_flow().unwrap();
        assert_eq!(seq.len(), 11);
        for kind in ActionKind::ALL {
            if kind == ActionKind::Drag {
                continue;
            }
            assert!(seq.iter().any(|a| a.kind == kind), "missing {kind}");
        }
        assert_eq!(seq.total_duration_ms(), 8800.0);
    }
}
