//! Streaming parse of the upstream on-call feed,
//! `<container><entries><entry>...</entry></entries></container>`.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::ingest::error::FeedError;
use crate::ingest::types::RawEntry;

/// Parse the feed XML into raw entries, in document order. Elements other
/// than the known entry fields are ignored. All field values stay text;
/// nothing is interpreted here.
pub fn parse_feed(xml: &str) -> Result<Vec<RawEntry>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut entry = RawEntry::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "entry" {
                    in_entry = true;
                    entry = RawEntry::default();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "entry" && in_entry {
                    in_entry = false;
                    entries.push(std::mem::take(&mut entry));
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    assign_field(&mut entry, &current_tag, text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    assign_field(&mut entry, &current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}

fn assign_field(entry: &mut RawEntry, tag: &str, value: String) {
    match tag {
        "id" => entry.id = value,
        "from" => entry.from = value,
        "to" => entry.to = value,
        "name" => entry.name = value,
        "street" => entry.street = value,
        "zipCode" => entry.zip_code = value,
        "location" => entry.location = value,
        "phone" => entry.phone = value,
        "lat" => entry.lat = value,
        "lon" => entry.lon = value,
        _ => {}
    }
}
