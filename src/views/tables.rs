//! The list components used by the dashboards.

use crate::models::{Fundraiser, Notification};
use crate::queries::fundraisers::StudentFundraiser;
use crate::queries::schools::SchoolRow;
use crate::queries::students::StudentRow;
use crate::views::{format_cents, format_date, format_flag, format_timestamp, TableView};

pub fn schools() -> TableView<SchoolRow> {
    TableView::<SchoolRow>::new("Schools")
        .column("School", |s| s.name.clone())
        .column("Administrator", |s| s.admin_name.clone())
        .column("Address", |s| s.address.clone().unwrap_or_default())
        .column("Account", |s| s.email.clone())
        .column("Students", |s| s.student_count.to_string())
        .column("Tickets", |s| s.ticket_count.to_string())
        .column("Joined", |s| format_timestamp(s.created_at))
        .empty_message("No schools have registered yet.")
}

/// Students across every school, for administrators.
pub fn all_students() -> TableView<StudentRow> {
    TableView::<StudentRow>::new("Students")
        .column("Student", |s| s.username.clone())
        .column("Email", |s| s.email.clone())
        .column("School", |s| s.school_name.clone())
        .column("Tickets", |s| s.ticket_count.to_string())
        .column("Raised", |s| format_cents(s.amount_raised))
        .empty_message("No students have registered yet.")
}

/// Students of the viewing school.
pub fn school_students() -> TableView<StudentRow> {
    TableView::<StudentRow>::new("Students")
        .column("Student", |s| s.username.clone())
        .column("Email", |s| s.email.clone())
        .column("Tickets", |s| s.ticket_count.to_string())
        .column("Raised", |s| format_cents(s.amount_raised))
        .column("Joined", |s| format_timestamp(s.created_at))
        .empty_message("No students have enrolled yet.")
}

pub fn fundraisers() -> TableView<Fundraiser> {
    TableView::<Fundraiser>::new("Fundraisers")
        .column("Event", |f| f.name.clone())
        .column("Location", |f| f.location.clone())
        .column("Date", |f| format_date(f.event_date))
        .column("Ticket price", |f| format_cents(i64::from(f.price)))
        .column("Status", |f| format_flag(f.is_active, "Active", "Closed"))
        .empty_message("No fundraisers scheduled.")
}

pub fn student_fundraisers() -> TableView<StudentFundraiser> {
    TableView::<StudentFundraiser>::new("Fundraisers")
        .column("Event", |f| f.fundraiser.name.clone())
        .column("Location", |f| f.fundraiser.location.clone())
        .column("Date", |f| format_date(f.fundraiser.event_date))
        .column("Ticket price", |f| format_cents(i64::from(f.fundraiser.price)))
        .column("Ticket", |f| format_flag(f.joined, "Joined", "Not joined"))
        .empty_message("Your school has no open fundraisers.")
}

pub fn notifications() -> TableView<Notification> {
    TableView::<Notification>::new("Notifications")
        .column("", |n| format_flag(n.read, "", "New"))
        .column("Title", |n| n.title.clone())
        .column("Message", |n| n.message.clone())
        .column("Received", |n| format_timestamp(n.created_at))
        .empty_message("You have no notifications.")
}
