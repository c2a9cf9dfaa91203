//! Presentation surface and the renderers that write films onto it.
//!
//! Renderers only translate data into surface mutations; they never touch the
//! network. The surface itself is a trait so the same renderers drive the
//! terminal front end and the in-memory surface used by tests.

use std::fmt::Write as _;

use shared::{
    domain::{available_tickets, FilmId},
    protocol::Film,
};

pub const BUY_TICKET_LABEL: &str = "Buy Ticket";
pub const SOLD_OUT_LABEL: &str = "Sold Out";
pub const DELETE_LABEL: &str = "Delete";
pub const DELETED_NOTICE: &str = "Movie successfully deleted";

/// Text regions of the detail panel, with the stable identifiers a surface
/// binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRegion {
    Runtime,
    Showtime,
    TicketCount,
    Description,
}

impl TextRegion {
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Showtime => "showtime",
            Self::TicketCount => "ticket-num",
            Self::Description => "film-info",
        }
    }
}

pub const POSTER_ELEMENT_ID: &str = "poster";
pub const TITLE_ELEMENT_ID: &str = "title";
pub const PURCHASE_CONTROL_ELEMENT_ID: &str = "buy-ticket";
pub const FILM_MENU_ELEMENT_ID: &str = "films";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub film_id: FilmId,
    pub title: String,
    pub delete_label: String,
}

impl MenuEntry {
    pub fn for_film(film: &Film) -> Self {
        Self {
            film_id: film.id.clone(),
            title: film.title.clone(),
            delete_label: DELETE_LABEL.to_string(),
        }
    }
}

/// Named UI handles the renderers write to.
pub trait PresentationSurface: Send {
    fn set_poster(&mut self, url: &str);
    /// Writes the title and attaches the displayed film's id to it.
    fn set_title(&mut self, title: &str, film_id: Option<&FilmId>);
    fn set_text(&mut self, region: TextRegion, text: &str);
    fn set_purchase_control(&mut self, enabled: bool, label: &str);
    fn clear_menu(&mut self);
    fn append_menu_entry(&mut self, entry: MenuEntry);
    /// Returns whether an entry for `film_id` was present.
    fn remove_menu_entry(&mut self, film_id: &FilmId) -> bool;
    /// The menu's id whose text form matches `film_id`, so a numeric id typed
    /// by a user finds an entry the server keyed by string and vice versa.
    fn menu_film_id(&self, film_id: &FilmId) -> Option<FilmId>;
    /// Blocking user notice.
    fn notify(&mut self, message: &str);
    fn displayed_film_id(&self) -> Option<FilmId>;
    fn purchase_enabled(&self) -> bool;
}

pub fn render_film_detail<S>(surface: &mut S, film: &Film)
where
    S: PresentationSurface + ?Sized,
{
    surface.set_poster(&film.poster);
    surface.set_title(&film.title, Some(&film.id));
    surface.set_text(TextRegion::Runtime, &format!("{} minutes", film.runtime));
    surface.set_text(TextRegion::Showtime, &film.showtime);
    render_ticket_availability(surface, film);
    surface.set_text(TextRegion::Description, &film.description);
}

pub fn render_ticket_availability<S>(surface: &mut S, film: &Film)
where
    S: PresentationSurface + ?Sized,
{
    let available = available_tickets(film.capacity, film.tickets_sold);
    surface.set_text(TextRegion::TicketCount, &available.to_string());
    if available == 0 {
        surface.set_purchase_control(false, SOLD_OUT_LABEL);
    } else {
        surface.set_purchase_control(true, BUY_TICKET_LABEL);
    }
}

pub fn render_film_menu<S>(surface: &mut S, films: &[Film])
where
    S: PresentationSurface + ?Sized,
{
    surface.clear_menu();
    for film in films {
        surface.append_menu_entry(MenuEntry::for_film(film));
    }
}

/// Detail panel state when the catalog has nothing to show.
pub fn render_empty_detail<S>(surface: &mut S)
where
    S: PresentationSurface + ?Sized,
{
    surface.set_poster("");
    surface.set_title("", None);
    surface.set_text(TextRegion::Runtime, "");
    surface.set_text(TextRegion::Showtime, "");
    surface.set_text(TextRegion::TicketCount, "0");
    surface.set_purchase_control(false, SOLD_OUT_LABEL);
    surface.set_text(TextRegion::Description, "");
}

/// Surface that keeps every region in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    pub poster: String,
    pub title: String,
    pub title_film_id: Option<FilmId>,
    pub runtime: String,
    pub showtime: String,
    pub ticket_count: String,
    pub description: String,
    pub purchase_enabled: bool,
    pub purchase_label: String,
    pub menu: Vec<MenuEntry>,
    pub notices: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, region: TextRegion) -> &str {
        match region {
            TextRegion::Runtime => &self.runtime,
            TextRegion::Showtime => &self.showtime,
            TextRegion::TicketCount => &self.ticket_count,
            TextRegion::Description => &self.description,
        }
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Plain-text snapshot of the detail panel and menu.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match &self.title_film_id {
            Some(id) => {
                let _ = writeln!(out, "{TITLE_ELEMENT_ID}: {} [{id}]", self.title);
                let _ = writeln!(out, "  {POSTER_ELEMENT_ID}: {}", self.poster);
                let _ = writeln!(out, "  {}: {}", TextRegion::Runtime.element_id(), self.runtime);
                let _ = writeln!(out, "  {}: {}", TextRegion::Showtime.element_id(), self.showtime);
                let _ = writeln!(out, "  available: {}", self.ticket_count);
                let _ = writeln!(out, "  {}", self.description);
            }
            None => {
                let _ = writeln!(out, "(no film selected)");
            }
        }
        let state = if self.purchase_enabled { "enabled" } else { "disabled" };
        let _ = writeln!(
            out,
            "  {PURCHASE_CONTROL_ELEMENT_ID}: [{}] ({state})",
            self.purchase_label
        );

        let _ = writeln!(out, "{FILM_MENU_ELEMENT_ID}:");
        if self.menu.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for entry in &self.menu {
            let marker = if Some(&entry.film_id) == self.title_film_id.as_ref() {
                '*'
            } else {
                ' '
            };
            let _ = writeln!(
                out,
                " {marker}{:>4}  {}  [{}]",
                entry.film_id.to_string(),
                entry.title,
                entry.delete_label
            );
        }
        out
    }
}

impl PresentationSurface for MemorySurface {
    fn set_poster(&mut self, url: &str) {
        self.poster = url.to_string();
    }

    fn set_title(&mut self, title: &str, film_id: Option<&FilmId>) {
        self.title = title.to_string();
        self.title_film_id = film_id.cloned();
    }

    fn set_text(&mut self, region: TextRegion, text: &str) {
        let slot = match region {
            TextRegion::Runtime => &mut self.runtime,
            TextRegion::Showtime => &mut self.showtime,
            TextRegion::TicketCount => &mut self.ticket_count,
            TextRegion::Description => &mut self.description,
        };
        *slot = text.to_string();
    }

    fn set_purchase_control(&mut self, enabled: bool, label: &str) {
        self.purchase_enabled = enabled;
        self.purchase_label = label.to_string();
    }

    fn clear_menu(&mut self) {
        self.menu.clear();
    }

    fn append_menu_entry(&mut self, entry: MenuEntry) {
        self.menu.push(entry);
    }

    fn remove_menu_entry(&mut self, film_id: &FilmId) -> bool {
        let before = self.menu.len();
        self.menu.retain(|entry| &entry.film_id != film_id);
        self.menu.len() != before
    }

    fn menu_film_id(&self, film_id: &FilmId) -> Option<FilmId> {
        let wanted = film_id.to_string();
        self.menu
            .iter()
            .find(|entry| entry.film_id.to_string() == wanted)
            .map(|entry| entry.film_id.clone())
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn displayed_film_id(&self) -> Option<FilmId> {
        self.title_film_id.clone()
    }

    fn purchase_enabled(&self) -> bool {
        self.purchase_enabled
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
