// Transactional email - team invitations, reminders, welcome notes and a
// delivery test.
//
// Templates are pure functions of `EmailConfig` plus the recipient details.
// `EmailService` adds the sender headers and hands the message to a `Mailer`.

use crate::core::moderation::Role;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use thiserror::Error;

pub const DEFAULT_FROM_EMAIL: &str = "noreply@usestatiq.com";
pub const DEFAULT_SUPPORT_EMAIL: &str = "support@usestatiq.com";
pub const DEFAULT_BASE_URL: &str = "https://app.usestatiq.com";

/// How long an invitation link stays valid.
pub const INVITATION_TTL_DAYS: u32 = 7;
pub const DEFAULT_REMINDER_DAYS: u32 = 3;

const TOKEN_BYTES: usize = 32;
const BRAND_GREEN: &str = "#B4D836";
const LOGO_URL: &str = "https://usestatiq.com/assets/WebLogo.png";

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("{} accounts are not invited to teams", .0.as_str())]
    NotInvitable(Role),
}

// ============================================================================
// MODELS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub from_email: String,
    pub support_email: String,
    /// Public web app root; links in emails point here.
    pub base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            support_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl EmailConfig {
    pub fn accept_url(&self, token: &str) -> String {
        format!("{}/accept-invite?token={}", self.base_url.trim_end_matches('/'), token)
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url.trim_end_matches('/'))
    }
}

/// A rendered message ready for a `Mailer`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Someone being asked to join a team.
#[derive(Debug, Clone)]
pub struct Invitation<'a> {
    pub to_email: &'a str,
    pub to_name: Option<&'a str>,
    pub team_name: &'a str,
    pub inviter_name: &'a str,
    pub token: &'a str,
    pub role: Role,
}

/// A freshly created account.
#[derive(Debug, Clone)]
pub struct Welcome<'a> {
    pub to_email: &'a str,
    pub to_name: &'a str,
    pub role: Role,
    pub team_name: Option<&'a str>,
    /// Set when an admin created the account on the user's behalf.
    pub temp_password: Option<&'a str>,
}

struct Rendered {
    subject: String,
    html: String,
}

// ============================================================================
// TRANSPORT TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message and return the transport's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError>;
}

/// URL-safe random token for invitation links.
pub fn generate_invitation_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

// ============================================================================
// TEMPLATES
// ============================================================================

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn first_name(name: Option<&str>) -> Option<&str> {
    name.and_then(|n| n.split_whitespace().next())
}

fn layout(preview: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><meta name="color-scheme" content="dark"></head>
<body style="margin:0; padding:0; background-color:#0a0a0a;">
<div style="display:none; max-height:0; overflow:hidden;">{preview}</div>
<table width="100%" cellpadding="0" cellspacing="0" border="0" bgcolor="#0a0a0a">
<tr><td align="center" style="padding:32px 16px;">
<table width="560" cellpadding="0" cellspacing="0" border="0" bgcolor="#141414" style="border-radius:16px; font-family:Helvetica,Arial,sans-serif;">
<tr><td align="center" style="padding:32px;"><img src="{logo}" alt="StatIQ" width="140"></td></tr>
<tr><td style="padding:0 32px 32px;">
{body}
</td></tr>
</table>
<div style="padding-top:16px;"><font color="#555555" style="font-size:11px;">StatIQ - Texas high school football, live.</font></div>
</td></tr>
</table>
</body>
</html>"##,
        preview = escape(preview),
        logo = LOGO_URL,
        body = body,
    )
}

fn button(label: &str, url: &str) -> String {
    format!(
        r##"<div style="text-align:center;"><a href="{url}" style="display:inline-block; padding:14px 32px; background-color:{green}; border-radius:8px; color:#0a0a0a; font-weight:700; text-decoration:none;">{label}</a></div>"##,
        url = escape(url),
        green = BRAND_GREEN,
        label = label,
    )
}

fn greeting(name: &str) -> String {
    format!(
        r##"<div style="font-size:15px; margin-bottom:8px;"><font color="#a0a0a0">Hey {},</font></div>"##,
        escape(name)
    )
}

fn paragraph(html: &str) -> String {
    format!(
        r##"<div style="font-size:15px; line-height:24px; margin-bottom:24px;"><font color="#a0a0a0">{}</font></div>"##,
        html
    )
}

fn highlight(text: &str) -> String {
    format!(r##"<font color="{}">{}</font>"##, BRAND_GREEN, escape(text))
}

fn feature_list(features: &[(&str, &str)]) -> String {
    let items: String = features
        .iter()
        .map(|(title, detail)| {
            format!(
                r##"<div style="margin-bottom:12px;"><font color="#e0e0e0"><b>{}</b></font><br/><font color="#808080">{}</font></div>"##,
                title, detail
            )
        })
        .collect();
    format!(
        r##"<table width="100%" cellpadding="0" cellspacing="0" border="0" bgcolor="#1a1a1a" style="border-radius:12px; margin-bottom:24px;"><tr><td style="padding:16px 20px;">{}</td></tr></table>"##,
        items
    )
}

fn notice(html: &str) -> String {
    format!(
        r##"<table width="100%" cellpadding="0" cellspacing="0" border="0" bgcolor="#2d2d00" style="border:1px solid #4d4d00; border-radius:12px; margin-bottom:24px;"><tr><td style="padding:14px 20px;"><font color="#cccc00">{}</font></td></tr></table>"##,
        html
    )
}

fn footnote(text: &str) -> String {
    format!(
        r##"<div style="text-align:center; margin-top:20px;"><font color="#666666" style="font-size:12px;">{}</font></div>"##,
        text
    )
}

const COACH_FEATURES: [(&str, &str); 3] = [
    ("Real-Time Stats", "5-15 second delivery, not 12-24 hours"),
    ("99.9% Accuracy", "Human-verified, not AI guesswork"),
    ("District Intel", "Scout opponents with real data"),
];

const PLAYER_FEATURES: [(&str, &str); 3] = [
    ("Track Your Stats", "Every game, every play, every yard"),
    ("Recruiting Profile", "Share your numbers with scouts"),
    ("District Rankings", "See where you stack up"),
];

const WELCOME_PLAYER_FEATURES: [(&str, &str); 3] = [
    ("Your Stats Dashboard", "All your game stats in one place"),
    ("Recruiting Profile", "Share your numbers with scouts"),
    ("District Rankings", "See where you stack up"),
];

const WELCOME_STAFF_FEATURES: [(&str, &str); 3] = [
    ("Real-Time Stats", "5-15 second delivery during games"),
    ("Team Management", "Invite players and coaches"),
    ("District Analytics", "Scout opponents with real data"),
];

fn coach_invitation(config: &EmailConfig, invite: &Invitation<'_>) -> Rendered {
    let role_display = if invite.role == Role::Admin {
        "an administrator"
    } else {
        "a coach"
    };
    let body = [
        greeting(first_name(invite.to_name).unwrap_or("Coach")),
        paragraph(&format!(
            r##"<font color="#e0e0e0">{}</font> invited you to join {} as {} on StatIQ."##,
            escape(invite.inviter_name),
            highlight(invite.team_name),
            role_display
        )),
        feature_list(&COACH_FEATURES),
        button("Accept Invitation", &config.accept_url(invite.token)),
        footnote(&format!("This invitation expires in {} days", INVITATION_TTL_DAYS)),
    ]
    .concat();

    Rendered {
        subject: format!("🏈 {} invited you to join {}", invite.inviter_name, invite.team_name),
        html: layout(
            &format!("{} invited you to join {}", invite.inviter_name, invite.team_name),
            &body,
        ),
    }
}

fn player_invitation(config: &EmailConfig, invite: &Invitation<'_>) -> Rendered {
    let body = [
        greeting(first_name(invite.to_name).unwrap_or("there")),
        paragraph(&format!(
            r##"<font color="#e0e0e0">Coach {}</font> invited you to join {} on StatIQ."##,
            escape(invite.inviter_name),
            highlight(invite.team_name)
        )),
        feature_list(&PLAYER_FEATURES),
        button("Join the Team", &config.accept_url(invite.token)),
        footnote(&format!("This invitation expires in {} days", INVITATION_TTL_DAYS)),
    ]
    .concat();

    Rendered {
        subject: format!("🏈 Coach {} wants you on {}", invite.inviter_name, invite.team_name),
        html: layout(
            &format!("Coach {} invited you to join {}", invite.inviter_name, invite.team_name),
            &body,
        ),
    }
}

fn invitation_reminder(
    config: &EmailConfig,
    invite: &Invitation<'_>,
    days_remaining: u32,
) -> Rendered {
    let body = [
        greeting(first_name(invite.to_name).unwrap_or("there")),
        paragraph(&format!(
            r##"Quick reminder: <font color="#e0e0e0">{}</font> invited you to join {} on StatIQ."##,
            escape(invite.inviter_name),
            highlight(invite.team_name)
        )),
        notice(&format!(
            "This invitation expires in <b>{} {}</b>",
            days_remaining,
            if days_remaining == 1 { "day" } else { "days" }
        )),
        button("Accept Invitation", &config.accept_url(invite.token)),
    ]
    .concat();

    Rendered {
        subject: format!("⏰ Your {} invitation expires soon", invite.team_name),
        html: layout(
            &format!("Your invitation to {} expires soon", invite.team_name),
            &body,
        ),
    }
}

fn welcome(config: &EmailConfig, welcome: &Welcome<'_>) -> Rendered {
    let name = first_name(Some(welcome.to_name)).unwrap_or("there");
    let team_text = welcome
        .team_name
        .map(|team| format!(" for {}", highlight(team)))
        .unwrap_or_default();
    let password_block = welcome
        .temp_password
        .map(|password| {
            notice(&format!(
                r##"<b>TEMPORARY PASSWORD</b><br/><font color="#ffffff" style="font-family:monospace; font-size:18px;">{}</font><br/><font color="#999900" style="font-size:12px;">Change this after your first login</font>"##,
                escape(password)
            ))
        })
        .unwrap_or_default();
    let features = if welcome.role == Role::Player {
        &WELCOME_PLAYER_FEATURES
    } else {
        &WELCOME_STAFF_FEATURES
    };

    let body = [
        greeting(name),
        paragraph(&format!("Welcome to StatIQ! Your account has been created{}.", team_text)),
        password_block,
        feature_list(features),
        button("Log In", &config.login_url()),
        footnote("Questions? Just reply to this email."),
    ]
    .concat();

    Rendered {
        subject: format!("🎉 Welcome to StatIQ, {}!", name),
        html: layout(&format!("Welcome to StatIQ, {}!", name), &body),
    }
}

fn delivery_check() -> Rendered {
    let body = r##"<div style="text-align:center;"><div style="font-size:24px; font-weight:700; margin-bottom:16px;"><font color="#e0e0e0">Email Test Successful</font></div><div style="font-size:15px;"><font color="#a0a0a0">Dark mode is working.</font></div></div>"##;
    Rendered {
        subject: "✅ StatIQ Email Test".to_string(),
        html: layout("StatIQ email test", body),
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct EmailService<M: Mailer> {
    mailer: M,
    config: EmailConfig,
}

impl<M: Mailer> EmailService<M> {
    pub fn new(mailer: M, config: EmailConfig) -> Self {
        Self { mailer, config }
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    async fn deliver(
        &self,
        to: &str,
        message: Rendered,
        reply_to_support: bool,
    ) -> Result<String, EmailError> {
        let to = to.trim();
        let valid = to
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid || to.chars().any(char::is_whitespace) {
            return Err(EmailError::InvalidRecipient(to.to_string()));
        }

        let email = OutgoingEmail {
            from: format!("StatIQ <{}>", self.config.from_email),
            to: to.to_string(),
            reply_to: reply_to_support.then(|| self.config.support_email.clone()),
            subject: message.subject,
            html: message.html,
        };
        let id = self.mailer.send(&email).await?;
        tracing::info!(to = %email.to, subject = %email.subject, id = %id, "Email sent");
        Ok(id)
    }

    /// Coaches and admins get the staff invitation, players the player one.
    pub async fn send_invitation(&self, invite: &Invitation<'_>) -> Result<String, EmailError> {
        let message = match invite.role {
            Role::Coach | Role::Admin => coach_invitation(&self.config, invite),
            Role::Player => player_invitation(&self.config, invite),
            Role::Fan => return Err(EmailError::NotInvitable(Role::Fan)),
        };
        self.deliver(invite.to_email, message, true).await
    }

    pub async fn send_invitation_reminder(
        &self,
        invite: &Invitation<'_>,
        days_remaining: u32,
    ) -> Result<String, EmailError> {
        if invite.role == Role::Fan {
            return Err(EmailError::NotInvitable(Role::Fan));
        }
        let message = invitation_reminder(&self.config, invite, days_remaining);
        self.deliver(invite.to_email, message, true).await
    }

    pub async fn send_welcome(&self, welcome_note: &Welcome<'_>) -> Result<String, EmailError> {
        let message = welcome(&self.config, welcome_note);
        self.deliver(welcome_note.to_email, message, true).await
    }

    pub async fn send_test_email(&self, to: &str) -> Result<String, EmailError> {
        self.deliver(to, delivery_check(), false).await
    }
}
