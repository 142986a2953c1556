use pyticket_lib::MetaTicket;
use serde::Serialize;

/// Ticket with its working flag for list/table views.
#[derive(Debug, Clone, Serialize)]
pub struct TicketListItem<'a> {
    #[serde(flatten)]
    pub ticket: &'a MetaTicket,
    pub working: bool,
}

/// Ticket with content and direct children for the show view.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetails<'a> {
    #[serde(flatten)]
    pub ticket: &'a MetaTicket,
    pub working: bool,
    pub parent: Option<&'a str>,
    pub children: Vec<&'a str>,
    pub content: String,
}
