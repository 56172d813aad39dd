//! HTML bodies for the three emails the service sends.
//!
//! Every value that originates from a submission or an administrator is escaped
//! before it is interpolated.

use crate::domain::{Ticket, TicketStatus};
use crate::ports::OutgoingEmail;
use crate::utils::format::{format_amount, format_money, mask_code, total_of};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

impl RenderedEmail {
    pub fn addressed(self, from: &str, to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: from.to_string(),
            to: to.to_string(),
            subject: self.subject,
            html: self.html,
        }
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Receipt sent to the submitter right after the ticket is stored.
pub fn client_confirmation(ticket: &Ticket) -> RenderedEmail {
    let items: String = ticket
        .line_items
        .iter()
        .map(|item| {
            format!(
                "<li>{} &ndash; {} &ndash; {}</li>",
                escape_html(&item.kind),
                escape_html(&item.code),
                escape_html(&format_money(&item.amount, &ticket.currency)),
            )
        })
        .collect();

    let html = format!(
        "<html><body>\
         <h2>Your ticket verification request</h2>\
         <p>We received your request. Reference: <strong>{id}</strong></p>\
         <ul>{items}</ul>\
         <p>Total: <strong>{total}</strong></p>\
         <p>You will receive another email once your tickets have been checked.</p>\
         </body></html>",
        id = ticket.id,
        items = items,
        total = escape_html(&format_money(&total_of(&ticket.line_items), &ticket.currency)),
    );

    RenderedEmail {
        subject: format!("Ticket verification request received ({})", ticket.id),
        html,
    }
}

/// Internal notification for the administrator.
pub fn admin_notification(ticket: &Ticket, admin_panel_url: Option<&str>) -> RenderedEmail {
    let rows: String = ticket
        .line_items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                index + 1,
                escape_html(&item.kind),
                escape_html(&item.code),
                format_amount(&item.amount),
            )
        })
        .collect();

    let panel_link = admin_panel_url
        .map(|url| {
            format!(
                "<p><a href=\"{}\">Open the admin panel</a></p>",
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let html = format!(
        "<html><body>\
         <h2>New ticket submitted</h2>\
         <p>Ticket: <strong>{id}</strong></p>\
         <p>Client email: {email}</p>\
         <p>Currency: {currency}</p>\
         <p>Submitted at: {submitted_at}</p>\
         <table border=\"1\" cellpadding=\"4\">\
         <tr><th>#</th><th>Type</th><th>Code</th><th>Amount</th></tr>\
         {rows}\
         <tr><td colspan=\"3\"><strong>Total</strong></td><td><strong>{total}</strong></td></tr>\
         </table>\
         {panel_link}\
         </body></html>",
        id = ticket.id,
        email = escape_html(&ticket.client_email),
        currency = escape_html(&ticket.currency),
        submitted_at = ticket.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
        rows = rows,
        total = escape_html(&format_money(&total_of(&ticket.line_items), &ticket.currency)),
        panel_link = panel_link,
    );

    RenderedEmail {
        subject: format!("New ticket to verify from {}", ticket.client_email),
        html,
    }
}

/// Final decision sent to the submitter. Codes are always masked.
///
/// Whitespace-only notes count as empty, so no blank reason block is rendered.
pub fn status_update(ticket: &Ticket) -> RenderedEmail {
    let first_code = ticket
        .line_items
        .first()
        .map(|item| mask_code(&item.code))
        .unwrap_or_else(|| mask_code(""));

    let (subject, intro) = match ticket.status {
        TicketStatus::Rejected => (
            "Your ticket has been rejected",
            format!(
                "Your ticket <strong>{}</strong> could not be validated.",
                escape_html(&first_code)
            ),
        ),
        _ => (
            "Your ticket has been validated",
            format!(
                "Your ticket <strong>{}</strong> has been validated.",
                escape_html(&first_code)
            ),
        ),
    };

    let reason = match (ticket.status, ticket.admin_notes.as_deref()) {
        (TicketStatus::Rejected, Some(notes)) if !notes.trim().is_empty() => format!(
            "<div class=\"rejection-reason\"><p><strong>Reason for rejection:</strong></p><p>{}</p></div>",
            escape_html(notes)
        ),
        _ => String::new(),
    };

    let items: String = ticket
        .line_items
        .iter()
        .map(|item| {
            format!(
                "<li>{} &ndash; {} &ndash; {}</li>",
                escape_html(&item.kind),
                escape_html(&mask_code(&item.code)),
                format_amount(&item.amount),
            )
        })
        .collect();

    let html = format!(
        "<html><body>\
         <p>{intro}</p>\
         {reason}\
         <ul>{items}</ul>\
         <p>Currency: {currency}</p>\
         </body></html>",
        intro = intro,
        reason = reason,
        items = items,
        currency = escape_html(&ticket.currency),
    );

    RenderedEmail {
        subject: subject.to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, TicketDraft};

    fn ticket() -> Ticket {
        Ticket::new(TicketDraft {
            client_email: "client@example.com".to_string(),
            currency: "EUR".to_string(),
            line_items: vec![
                LineItem {
                    kind: "PCS".to_string(),
                    code: "12345678".to_string(),
                    amount: "10.5".parse().unwrap(),
                },
                LineItem {
                    kind: "Neosurf".to_string(),
                    code: "<b>ABCDEFGH".to_string(),
                    amount: "20.25".parse().unwrap(),
                },
            ],
        })
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn confirmation_lists_items_and_total() {
        let ticket = ticket();
        let email = client_confirmation(&ticket);

        assert!(email.html.contains(&ticket.id.to_string()));
        assert!(email.html.contains("12345678"));
        assert!(email.html.contains("&lt;b&gt;ABCDEFGH"));
        assert!(email.html.contains("30.75 EUR"));
    }

    #[test]
    fn admin_notification_has_total_row_and_panel_link() {
        let ticket = ticket();
        let email = admin_notification(&ticket, Some("https://admin.example.com/panel"));

        assert!(email.html.contains("client@example.com"));
        assert!(email.html.contains("<td>10.50</td>"));
        assert!(email.html.contains("<strong>Total</strong>"));
        assert!(email.html.contains("30.75 EUR"));
        assert!(email.html.contains("https://admin.example.com/panel"));

        let without_link = admin_notification(&ticket, None);
        assert!(!without_link.html.contains("admin panel"));
    }

    #[test]
    fn validated_email_masks_codes() {
        let mut ticket = ticket();
        ticket.status = TicketStatus::Validated;
        ticket.admin_notes = Some("all good".to_string());

        let email = status_update(&ticket);
        assert!(email.html.contains("12****78"));
        assert!(!email.html.contains("12345678"));
        assert!(!email.html.contains("Reason for rejection"));
        assert!(email.html.contains("EUR"));
    }

    #[test]
    fn rejected_email_shows_reason_only_when_present() {
        let mut ticket = ticket();
        ticket.status = TicketStatus::Rejected;
        ticket.admin_notes = Some("Code already used".to_string());

        let email = status_update(&ticket);
        assert!(email.html.contains("Reason for rejection"));
        assert!(email.html.contains("Code already used"));
        assert!(email.html.contains("could not be validated"));

        ticket.admin_notes = Some("  ".to_string());
        assert!(!status_update(&ticket).html.contains("Reason for rejection"));

        ticket.admin_notes = None;
        assert!(!status_update(&ticket).html.contains("Reason for rejection"));
    }
}
