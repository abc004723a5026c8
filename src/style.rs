//! Fixed layout and colour values consumed by the renderers.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub form_background: Rgb,
    pub border: Rgb,
    pub card_background: Rgb,
    pub description: Rgb,
    pub spinner: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgb::hex(0xffffff),
            form_background: Rgb::hex(0xf1f1f1),
            border: Rgb::hex(0xdddddd),
            card_background: Rgb::hex(0xf8f8f8),
            description: Rgb::hex(0x333333),
            spinner: Rgb::hex(0x0000ff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    pub header: &'static str,
    pub placeholder: &'static str,
    pub columns: u16,
    /// Space on each side of a card; a cell is `width / columns - 2 * card_margin`.
    pub card_margin: u16,
    pub image_width: u16,
    pub image_height: u16,
    /// Strip markup from descriptions. Off unless configured.
    pub plain_text: bool,
    pub palette: Palette,
}

impl Default for StyleSheet {
    /// Point-based values of the phone layout.
    fn default() -> Self {
        StyleSheet {
            header: "Buscar Anime",
            placeholder: "Buscar por nombre",
            columns: 2,
            card_margin: 5,
            image_width: 80,
            image_height: 120,
            plain_text: false,
            palette: Palette::default(),
        }
    }
}

impl StyleSheet {
    /// Same layout scaled to terminal cells, which are about twice as tall
    /// as they are wide. The cover box keeps its 2:3 aspect.
    pub fn terminal() -> Self {
        StyleSheet {
            card_margin: 1,
            image_width: 12,
            image_height: 9,
            ..StyleSheet::default()
        }
    }

    pub fn with_plain_text(mut self, plain_text: bool) -> Self {
        self.plain_text = plain_text;
        self
    }

    pub fn cell_width(&self, screen_width: u16) -> u16 {
        let columns = self.columns.max(1);
        (screen_width / columns)
            .saturating_sub(2 * self.card_margin)
            .max(1)
    }
}

#[test]
fn test_cell_width() {
    let style = StyleSheet::default();
    assert_eq!(style.cell_width(400), 190);
    assert_eq!(style.cell_width(5), 1);

    let style = StyleSheet::terminal();
    assert_eq!(style.cell_width(80), 38);
    assert_eq!(style.cell_width(81), 38);
}

#[test]
fn test_rgb_hex() {
    assert_eq!(Rgb::hex(0x0000ff), Rgb(0, 0, 255));
    assert_eq!(Rgb::hex(0xf1f1f1), Rgb(241, 241, 241));
}
