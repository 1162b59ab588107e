use tracing::{debug, warn};

use crate::common::is_allowed_country;
use crate::domains::invites::models::Invite;
use crate::domains::users::User;
use crate::kernel::ServerDeps;

/// Text for the invite SMS. The link is only included when a public invite
/// page is configured.
pub(super) fn invite_message(
    invite: &Invite,
    sender_name: Option<&str>,
    public_invite_url: Option<&str>,
) -> String {
    let from = sender_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(&invite.sender_phone);

    let mut body = format!(
        "{} wants to make it official! They've invited you to be their {}.",
        from,
        invite.relationship_type.as_phrase()
    );

    if let Some(base) = public_invite_url {
        body.push_str(&format!(
            " Click here to respond: {}/{}",
            base.trim_end_matches('/'),
            invite.id
        ));
    }

    body
}

/// Name to show in the invite SMS. A failed lookup falls back to the phone.
fn sender_name(invite: &Invite, lookup: anyhow::Result<Option<User>>) -> Option<String> {
    match lookup {
        Ok(user) => user.and_then(|u| u.name),
        Err(e) => {
            warn!(invite_id = %invite.id, error = %e, "Failed to load sender name for invite SMS");
            None
        }
    }
}

/// Tell the recipient about a new invite. Best-effort: failures are logged
/// and never reach the sender, whose invite is already stored.
pub(super) async fn notify_recipient(invite: &Invite, deps: &ServerDeps) {
    if !is_allowed_country(&invite.recipient_phone) {
        warn!(
            invite_id = %invite.id,
            "Recipient outside supported regions, skipping invite SMS"
        );
        return;
    }

    let lookup = User::find_by_phone(&invite.sender_phone, &deps.db_pool).await;
    let name = sender_name(invite, lookup);
    let body = invite_message(invite, name.as_deref(), deps.public_invite_url.as_deref());

    match deps.sms.send_sms(&invite.recipient_phone, &body).await {
        Ok(()) => debug!(invite_id = %invite.id, "Invite SMS sent"),
        Err(e) => warn!(invite_id = %invite.id, error = %e, "Failed to send invite SMS"),
    }
}
