use workdeck_core::WorkItem;

pub struct TableFormatter {
    id_width: usize,
    title_width: usize,
    status_width: usize,
    epic_width: usize,
}

impl TableFormatter {
    pub fn new(items: &[WorkItem]) -> Self {
        let id_width = items
            .iter()
            .map(|i| i.id.chars().count())
            .max()
            .unwrap_or(6)
            .clamp(2, 16); // Between "ID" header min and reasonable id length max

        let title_width = items
            .iter()
            .map(|i| i.title.chars().count())
            .max()
            .unwrap_or(24)
            .clamp(5, 50);

        Self {
            id_width,
            title_width,
            status_width: 8,
            epic_width: 10,
        }
    }

    pub fn print_table(&self, items: &[WorkItem]) {
        self.print_header();
        for item in items {
            self.print_row(item);
        }
        self.print_footer();
    }

    fn print_header(&self) {
        println!("{}", self.top_border());
        println!("{}", self.header_row());
        println!("{}", self.separator());
    }

    fn print_footer(&self) {
        println!("{}", self.bottom_border());
    }

    fn print_row(&self, item: &WorkItem) {
        let epic_display = item.epic.as_deref().unwrap_or("");

        println!(
            "│ {:<width_id$} │ {:<width_title$} │ {:<width_status$} │ {:<width_epic$} │",
            truncate(&item.id, self.id_width),
            truncate(&item.title, self.title_width),
            format!("{:?}", item.status).to_lowercase(),
            truncate(epic_display, self.epic_width),
            width_id = self.id_width,
            width_title = self.title_width,
            width_status = self.status_width,
            width_epic = self.epic_width,
        );
    }

    fn top_border(&self) -> String {
        format!(
            "┌{}┬{}┬{}┬{}┐",
            "─".repeat(self.id_width + 2),
            "─".repeat(self.title_width + 2),
            "─".repeat(self.status_width + 2),
            "─".repeat(self.epic_width + 2),
        )
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:<width_id$} │ {:<width_title$} │ {:<width_status$} │ {:<width_epic$} │",
            "ID",
            "Title",
            "Status",
            "Epic",
            width_id = self.id_width,
            width_title = self.title_width,
            width_status = self.status_width,
            width_epic = self.epic_width,
        )
    }

    fn separator(&self) -> String {
        format!(
            "├{}┼{}┼{}┼{}┤",
            "─".repeat(self.id_width + 2),
            "─".repeat(self.title_width + 2),
            "─".repeat(self.status_width + 2),
            "─".repeat(self.epic_width + 2),
        )
    }

    fn bottom_border(&self) -> String {
        format!(
            "└{}┴{}┴{}┴{}┘",
            "─".repeat(self.id_width + 2),
            "─".repeat(self.title_width + 2),
            "─".repeat(self.status_width + 2),
            "─".repeat(self.epic_width + 2),
        )
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        // Safely truncate at character boundaries, not byte boundaries
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
