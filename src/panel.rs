/// Hover panel state
///
/// One `HoverPanel` per hoverable scene object. The panel holds that
/// object's dataset entries (already sorted by year) and the cursor
/// position within them: which year is shown and which of the current
/// entry's images. Wheel input steps years, click input cycles images.
use crate::dataset::DataEntry;

#[derive(Debug, Clone)]
pub struct HoverPanel {
    pub object_index: usize,
    pub object_name: String,
    entries: Vec<DataEntry>,
    year_index: usize,
    image_index: usize,
    visible: bool,
}

impl HoverPanel {
    pub fn new(object_index: usize, object_name: &str, entries: Vec<DataEntry>) -> Self {
        Self {
            object_index,
            object_name: object_name.to_string(),
            entries,
            year_index: 0,
            image_index: 0,
            visible: false,
        }
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the panel. The year position is kept from the previous hover,
    /// the image position starts over. No-op without entries.
    pub fn show(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.visible = true;
        self.image_index = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Step through the entries by year, wrapping at both ends. Changing
    /// the year starts the image cycle over.
    pub fn scroll_year(&mut self, delta: i32) {
        if !self.visible || self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as i32;
        self.year_index = (self.year_index as i32 + delta).rem_euclid(len) as usize;
        self.image_index = 0;
    }

    /// Advance to the next image of the current entry, wrapping around.
    /// Entries with fewer than two images ignore clicks.
    pub fn cycle_image(&mut self) {
        if !self.visible {
            return;
        }
        if let Some(entry) = self.entries.get(self.year_index) {
            if entry.image_file_names.len() > 1 {
                self.image_index = (self.image_index + 1) % entry.image_file_names.len();
            }
        }
    }

    pub fn current_entry(&self) -> Option<&DataEntry> {
        self.entries.get(self.year_index)
    }

    pub fn current_image_file(&self) -> Option<&str> {
        let entry = self.current_entry()?;
        if entry.image_file_names.is_empty() {
            return None;
        }
        let index = self.image_index.min(entry.image_file_names.len() - 1);
        Some(entry.image_file_names[index].as_str())
    }

    /// Year line shown under the entry name. Multi-entry panels get the
    /// scroll hint, single-entry panels just the year.
    pub fn year_label(&self) -> String {
        match self.current_entry() {
            Some(entry) if self.entries.len() > 1 => format!(
                "\u{25C4}  {}  \u{25BA}   ({}/{})  [Scroll to change year]",
                entry.year,
                self.year_index + 1,
                self.entries.len()
            ),
            Some(entry) => format!("{}", entry.year),
            None => String::new(),
        }
    }

    /// Counter under the image, only when there is something to browse.
    pub fn image_counter_label(&self) -> Option<String> {
        let entry = self.current_entry()?;
        if entry.image_file_names.len() > 1 {
            Some(format!(
                "Image {}/{}  [Click to browse]",
                self.image_index.min(entry.image_file_names.len() - 1) + 1,
                entry.image_file_names.len()
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(year: i32, images: &[&str]) -> DataEntry {
        DataEntry {
            tag: "mill".to_string(),
            year,
            name: format!("Mill {}", year),
            description1: "first".to_string(),
            description2: "second".to_string(),
            image_file_names: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_show_resets_image_but_keeps_year() {
        let mut panel = HoverPanel::new(0, "mill", vec![
            entry(1870, &["a.jpg", "b.jpg"]),
            entry(1905, &["c.jpg"]),
        ]);
        panel.show();
        panel.scroll_year(1);
        panel.cycle_image();
        panel.hide();
        panel.show();
        assert_eq!(panel.current_entry().unwrap().year, 1905);
        assert_eq!(panel.current_image_file(), Some("c.jpg"));
    }

    #[test]
    fn test_scroll_wraps_both_ways() {
        let mut panel = HoverPanel::new(0, "mill", vec![
            entry(1870, &[]),
            entry(1905, &[]),
            entry(1950, &[]),
        ]);
        panel.show();
        panel.scroll_year(-1);
        assert_eq!(panel.current_entry().unwrap().year, 1950);
        panel.scroll_year(1);
        panel.scroll_year(1);
        panel.scroll_year(1);
        panel.scroll_year(1);
        assert_eq!(panel.current_entry().unwrap().year, 1905);
    }

    #[test]
    fn test_year_change_resets_image_cycle() {
        let mut panel = HoverPanel::new(0, "mill", vec![
            entry(1870, &["a.jpg", "b.jpg"]),
            entry(1905, &["c.jpg", "d.jpg"]),
        ]);
        panel.show();
        panel.cycle_image();
        assert_eq!(panel.current_image_file(), Some("b.jpg"));
        panel.scroll_year(1);
        assert_eq!(panel.current_image_file(), Some("c.jpg"));
    }

    #[test]
    fn test_click_wraps_images() {
        let mut panel = HoverPanel::new(0, "mill", vec![entry(1870, &["a.jpg", "b.jpg"])]);
        panel.show();
        panel.cycle_image();
        panel.cycle_image();
        assert_eq!(panel.current_image_file(), Some("a.jpg"));
    }

    #[test]
    fn test_single_image_ignores_clicks() {
        let mut panel = HoverPanel::new(0, "mill", vec![entry(1870, &["a.jpg"])]);
        panel.show();
        panel.cycle_image();
        assert_eq!(panel.current_image_file(), Some("a.jpg"));
        assert_eq!(panel.image_counter_label(), None);
    }

    #[test]
    fn test_empty_panel_never_shows() {
        let mut panel = HoverPanel::new(0, "mill", Vec::new());
        panel.show();
        assert!(!panel.is_visible());
        assert_eq!(panel.current_image_file(), None);
    }

    #[test]
    fn test_year_labels() {
        let mut multi = HoverPanel::new(0, "mill", vec![entry(1870, &[]), entry(1905, &[])]);
        multi.show();
        assert_eq!(
            multi.year_label(),
            "\u{25C4}  1870  \u{25BA}   (1/2)  [Scroll to change year]"
        );

        let mut single = HoverPanel::new(0, "mill", vec![entry(1923, &[])]);
        single.show();
        assert_eq!(single.year_label(), "1923");
    }

    #[test]
    fn test_image_counter_label() {
        let mut panel = HoverPanel::new(0, "mill", vec![entry(1870, &["a.jpg", "b.jpg", "c.jpg"])]);
        panel.show();
        panel.cycle_image();
        assert_eq!(
            panel.image_counter_label(),
            Some("Image 2/3  [Click to browse]".to_string())
        );
    }
}
