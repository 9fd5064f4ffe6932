mod common;

use common::open_stores;
use licenseverify_core::{CoreError, SupportIntake};
use licenseverify_types::{NewTicket, TicketPriority};

fn full_submission() -> NewTicket {
    NewTicket {
        company_name: "Acme Corp".into(),
        contact_name: "Jo Doe".into(),
        contact_email: "jo@acme.test".into(),
        contact_phone: Some("+1 555 0100".into()),
        issue_description: "Activation fails on air-gapped host".into(),
        priority: Some(TicketPriority::High),
    }
}

#[test]
fn submit_persists_open_ticket() {
    let (_licenses, tickets, _audit, _dir) = open_stores();
    let intake = SupportIntake::new(tickets.clone());

    let id = intake.submit(full_submission()).unwrap();
    let stored = tickets.get(id).unwrap().unwrap();
    assert_eq!(stored.status, "open");
    assert_eq!(stored.priority, TicketPriority::High);
    assert_eq!(stored.company_name, "Acme Corp");
}

#[test]
fn submit_applies_defaults() {
    let (_licenses, tickets, _audit, _dir) = open_stores();
    let intake = SupportIntake::new(tickets.clone());

    let id = intake
        .submit(NewTicket {
            contact_phone: None,
            priority: None,
            ..full_submission()
        })
        .unwrap();
    let stored = tickets.get(id).unwrap().unwrap();
    assert_eq!(stored.contact_phone, "");
    assert_eq!(stored.priority, TicketPriority::Medium);
}

#[test]
fn missing_issue_description_is_named() {
    let (_licenses, tickets, _audit, _dir) = open_stores();
    let intake = SupportIntake::new(tickets.clone());

    let result = intake.submit(NewTicket {
        issue_description: String::new(),
        ..full_submission()
    });
    assert!(
        matches!(result, Err(CoreError::Validation(msg)) if msg.contains("issue_description"))
    );
    assert_eq!(tickets.count().unwrap(), 0);
}

#[test]
fn first_missing_field_wins() {
    let (_licenses, tickets, _audit, _dir) = open_stores();
    let intake = SupportIntake::new(tickets);

    // Both company_name and issue_description missing; checked order
    // reports company_name
    let result = intake.submit(NewTicket {
        company_name: String::new(),
        issue_description: String::new(),
        ..full_submission()
    });
    assert!(matches!(result, Err(CoreError::Validation(msg)) if msg.contains("company_name")));
}

#[test]
fn whitespace_only_field_is_missing() {
    let (_licenses, tickets, _audit, _dir) = open_stores();
    let intake = SupportIntake::new(tickets);

    let result = intake.submit(NewTicket {
        contact_name: "   ".into(),
        ..full_submission()
    });
    assert!(matches!(result, Err(CoreError::Validation(msg)) if msg.contains("contact_name")));
}

#[test]
fn resubmission_creates_a_new_ticket() {
    let (_licenses, tickets, _audit, _dir) = open_stores();
    let intake = SupportIntake::new(tickets.clone());

    let first = intake.submit(full_submission()).unwrap();
    let second = intake.submit(full_submission()).unwrap();
    assert_ne!(first, second);
    assert_eq!(tickets.count().unwrap(), 2);
}
