//! Session command handlers.

use std::sync::Arc;

use bakery_client::ApiClient;
use bakery_storefront::{Access, AuthGate, GateDecision};

/// Signs in and persists the token to the session file.
///
/// # Errors
///
/// Returns the backend's message when the credentials are rejected.
pub(crate) async fn run_login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    client.login(email, password).await.map_err(super::explain)?;

    match client.current_user().await {
        Ok(user) => {
            let landing = AuthGate::after_login(None);
            println!("signed in as {} ({})", user.email, role(user.is_admin));
            if user.is_admin {
                println!("admin pages available, start at {landing}");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "signed in but could not load profile");
            println!("signed in");
        }
    }
    Ok(())
}

pub(crate) fn run_logout(client: &ApiClient) {
    let was_signed_in = client.is_authenticated();
    client.logout();
    if was_signed_in {
        println!("signed out");
    } else {
        println!("not signed in");
    }
}

/// Prints the current account, or the gate's verdict when there is none.
///
/// # Errors
///
/// Returns an error when the profile request fails for a reason other than
/// an expired session.
pub(crate) async fn run_whoami(client: &ApiClient) -> anyhow::Result<()> {
    let gate = AuthGate::new(Arc::clone(client.session()));
    if let GateDecision::Login { .. } = gate.check("/account", Access::SignedIn, None) {
        println!("not signed in; run `bakery login`");
        return Ok(());
    }

    match client.current_user().await {
        Ok(user) => {
            println!("{:<10}{}", "ID", user.id);
            println!("{:<10}{}", "EMAIL", user.email);
            if !user.full_name.is_empty() {
                println!("{:<10}{}", "NAME", user.full_name);
            }
            println!("{:<10}{}", "ROLE", role(user.is_admin));
            if let Some(created) = user.created_at {
                println!("{:<10}{}", "SINCE", created.format("%Y-%m-%d"));
            }
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            println!("session expired; run `bakery login`");
            Ok(())
        }
        Err(e) => Err(super::explain(e)),
    }
}

fn role(is_admin: bool) -> &'static str {
    if is_admin {
        "admin"
    } else {
        "customer"
    }
}
