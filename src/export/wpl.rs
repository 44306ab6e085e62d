//! Windows Media Player (`.wpl`) playlist generation

use super::path::escape_xml;

/// Playlist file extension
pub const EXTENSION: &str = "wpl";

const GENERATOR: &str = concat!("tunes2wpl/", env!("CARGO_PKG_VERSION"));

/// Running totals for one playlist's export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTally {
    pub item_count: usize,
    pub total_duration_secs: u64,
    /// Escaped `src` values, in playlist order
    pub media_entries: Vec<String>,
    pub copied: usize,
    pub already_present: usize,
}

impl ExportTally {
    pub fn push(&mut self, display_path: String, duration_secs: u64) {
        self.item_count += 1;
        self.total_duration_secs += duration_secs;
        self.media_entries.push(display_path);
    }
}

/// Render the playlist document as 7-bit ASCII bytes
///
/// The title is escaped here; media entries must already be escaped. Any
/// character above U+007F becomes a decimal character reference.
pub fn serialize(title: &str, tally: &ExportTally) -> Vec<u8> {
    let mut doc = String::new();
    doc.push_str("<?wpl version=\"1.0\"?>\n");
    doc.push_str("<smil>\n");
    doc.push_str("    <head>\n");
    doc.push_str(&format!("        <title>{}</title>\n", escape_xml(title)));
    doc.push_str(&format!(
        "        <meta name=\"Generator\" content=\"{}\"/>\n",
        GENERATOR
    ));
    doc.push_str(&format!(
        "        <meta name=\"ItemCount\" content=\"{}\"/>\n",
        tally.item_count
    ));
    doc.push_str(&format!(
        "        <meta name=\"TotalDuration\" content=\"{}\"/>\n",
        tally.total_duration_secs
    ));
    doc.push_str("    </head>\n");
    doc.push_str("    <body>\n");
    doc.push_str("        <seq>\n");
    for entry in &tally.media_entries {
        doc.push_str(&format!("            <media src=\"{}\"/>\n", entry));
    }
    doc.push_str("        </seq>\n");
    doc.push_str("    </body>\n");
    doc.push_str("</smil>");

    encode_ascii(&doc)
}

/// ASCII with numeric character references for everything else
fn encode_ascii(text: &str) -> Vec<u8> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&format!("&#{};", c as u32));
        }
    }
    out.into_bytes()
}
