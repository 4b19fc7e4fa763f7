use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Earth,
    Mars,
    Moon,
    Galaxy,
    Nebula,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Earth => "earth",
            Category::Mars => "mars",
            Category::Moon => "moon",
            Category::Galaxy => "galaxy",
            Category::Nebula => "nebula",
        }
    }

    /// Badge color as RGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Category::Earth => [96, 165, 250],
            Category::Mars => [248, 113, 113],
            Category::Moon => [156, 163, 175],
            Category::Galaxy => [192, 132, 252],
            Category::Nebula => [244, 114, 182],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub resolution: &'static str,
    pub date: NaiveDate,
    /// File name relative to the configured assets directory.
    pub image: &'static str,
}

impl CatalogEntry {
    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn sample_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            id: "1",
            name: "Andromeda Galaxy",
            description: "2.5 gigapixel image of the Andromeda galaxy captured by Hubble Space Telescope",
            category: Category::Galaxy,
            resolution: "2.5 GP",
            date: date(2015, 1, 5),
            image: "andromeda-galaxy-detailed-hubble-space-telescope.jpg",
        },
        CatalogEntry {
            id: "2",
            name: "Mars Surface - Valles Marineris",
            description: "High-resolution map of Mars showing the Valles Marineris canyon system",
            category: Category::Mars,
            resolution: "1.8 GP",
            date: date(2024, 3, 15),
            image: "mars-surface-valles-marineris-canyon-detailed.jpg",
        },
        CatalogEntry {
            id: "3",
            name: "Earth - North America",
            description: "Composite satellite image of North America from multiple NASA satellites",
            category: Category::Earth,
            resolution: "3.2 GP",
            date: date(2024, 9, 20),
            image: "earth-north-america-satellite-view-detailed.jpg",
        },
        CatalogEntry {
            id: "4",
            name: "Lunar South Pole",
            description: "Detailed map of the lunar south pole from Lunar Reconnaissance Orbiter",
            category: Category::Moon,
            resolution: "1.5 GP",
            date: date(2023, 11, 10),
            image: "moon-south-pole-craters-detailed-surface.jpg",
        },
        CatalogEntry {
            id: "5",
            name: "Carina Nebula",
            description: "Ultra-high resolution image of the Carina Nebula star-forming region",
            category: Category::Nebula,
            resolution: "4.1 GP",
            date: date(2022, 7, 12),
            image: "carina-nebula-colorful-stars-cosmic-clouds.jpg",
        },
        CatalogEntry {
            id: "6",
            name: "Mars - Olympus Mons",
            description: "The largest volcano in the solar system captured in stunning detail",
            category: Category::Mars,
            resolution: "2.2 GP",
            date: date(2024, 1, 8),
            image: "mars-olympus-mons-volcano-aerial-view.jpg",
        },
    ]
}

// ── Selection store ─────────────────────────────────────────────────────────

pub struct Catalog {
    entries: Vec<CatalogEntry>,
    selected: usize,
    sidebar_open: bool,
    pub query: String,
}

impl Catalog {
    /// `entries` must not be empty; the first one starts selected.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        assert!(!entries.is_empty(), "catalog needs at least one entry");
        Self {
            entries,
            selected: 0,
            sidebar_open: true,
            query: String::new(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn filtered(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.matches(&self.query))
    }

    pub fn selected(&self) -> &CatalogEntry {
        &self.entries[self.selected]
    }

    /// Returns true when `id` names an entry. Re-selecting the current
    /// entry still counts, so the viewer resets as on any selection.
    pub fn select(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}
