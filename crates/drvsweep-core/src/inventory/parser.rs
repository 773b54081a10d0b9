//! Parser for `pnputil /enum-drivers /devices /format xml` output.
//!
//! The XML element names are stable across system locales, unlike the
//! labels of the default text output. The document looks like:
//!
//! ```xml
//! <PnpUtil>
//!   <Driver DriverName="oem12.inf">
//!     <OriginalName>nvhda.inf</OriginalName>
//!     <ProviderName>NVIDIA Corporation</ProviderName>
//!     <ClassName>MEDIA</ClassName>
//!     <Devices count="1">
//!       <Device InstanceId="HDAUDIO\FUNC_01&amp;VEN_10DE" />
//!     </Devices>
//!   </Driver>
//! </PnpUtil>
//! ```
//!
//! Parsing is all-or-nothing: any well-formedness error fails the whole
//! document.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::domain::{DriverOrigin, DriverRecord, NOT_AVAILABLE};
use crate::ports::ParseError;

const DRIVER_TAG: &[u8] = b"Driver";
const DRIVER_NAME_ATTR: &[u8] = b"DriverName";
const DEVICES_TAG: &[u8] = b"devices";
const COUNT_ATTR: &[u8] = b"count";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OriginalName,
    ProviderName,
    ClassName,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"OriginalName" => Some(Self::OriginalName),
            b"ProviderName" => Some(Self::ProviderName),
            b"ClassName" => Some(Self::ClassName),
            _ => None,
        }
    }
}

/// The device-binding sub-node of one driver entry.
#[derive(Debug)]
struct DevicesNode {
    depth: usize,
    declared: Option<u32>,
    children: u32,
    /// Cleared once the element closes; later siblings never count.
    open: bool,
}

impl DevicesNode {
    /// An explicit `count` wins over the number of children.
    fn usage_count(&self) -> u32 {
        self.declared.unwrap_or(self.children)
    }
}

/// A driver entry being assembled while its element is open.
#[derive(Debug, Default)]
struct DriverEntry {
    depth: usize,
    package_name: String,
    original_name: Option<String>,
    provider_name: Option<String>,
    class_name: Option<String>,
    devices: Option<DevicesNode>,
    capture: Option<(Field, String)>,
}

impl DriverEntry {
    fn new(depth: usize, package_name: String) -> Self {
        Self {
            depth,
            package_name,
            ..Self::default()
        }
    }

    /// Called for every element opened inside this entry.
    fn open_child(&mut self, element: &BytesStart<'_>, depth: usize) -> Result<(), ParseError> {
        if let Some(devices) = self.devices.as_mut()
            && devices.open
            && depth == devices.depth + 1
        {
            devices.children += 1;
        }

        if depth != self.depth + 1 {
            return Ok(());
        }

        let name = element.local_name();
        if name.as_ref().eq_ignore_ascii_case(DEVICES_TAG) {
            if self.devices.is_none() {
                self.devices = Some(DevicesNode {
                    depth,
                    declared: attribute(element, COUNT_ATTR)?.as_deref().and_then(parse_count),
                    children: 0,
                    open: true,
                });
            }
        } else if let Some(field) = Field::from_tag(name.as_ref())
            && self.field(field).is_none()
        {
            self.capture = Some((field, String::new()));
        }
        Ok(())
    }

    /// Called for every element closed inside this entry.
    fn close_child(&mut self, depth: usize) {
        if let Some(devices) = self.devices.as_mut()
            && depth == devices.depth
        {
            devices.open = false;
        }

        if depth == self.depth + 1
            && let Some((field, text)) = self.capture.take()
        {
            *self.field_mut(field) = Some(text);
        }
    }

    fn push_text(&mut self, text: &str, depth: usize) {
        if depth == self.depth + 2
            && let Some((_, buffer)) = self.capture.as_mut()
        {
            buffer.push_str(text);
        }
    }

    const fn field(&self, field: Field) -> Option<&String> {
        match field {
            Field::OriginalName => self.original_name.as_ref(),
            Field::ProviderName => self.provider_name.as_ref(),
            Field::ClassName => self.class_name.as_ref(),
        }
    }

    const fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::OriginalName => &mut self.original_name,
            Field::ProviderName => &mut self.provider_name,
            Field::ClassName => &mut self.class_name,
        }
    }

    fn into_record(self) -> DriverRecord {
        let package_name = self.package_name.trim().to_string();
        DriverRecord {
            origin: DriverOrigin::classify(&package_name),
            usage_count: self.devices.as_ref().map_or(0, DevicesNode::usage_count),
            original_name: or_not_available(self.original_name),
            provider_name: or_not_available(self.provider_name),
            class_name: or_not_available(self.class_name),
            package_name,
        }
    }
}

/// Parse a structured driver listing into OEM-origin records.
///
/// Non-OEM entries are dropped. An empty listing yields an empty vector.
///
/// # Errors
///
/// Returns [`ParseError`] if the document is not well-formed XML or has
/// no root element.
pub fn parse_driver_listing(xml: &str) -> Result<Vec<DriverRecord>, ParseError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<DriverEntry> = None;
    let mut records = Vec::new();
    let mut skipped = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(ParseError::new(format!(
                    "{e} (at byte {})",
                    reader.buffer_position()
                )));
            }
        };

        match event {
            Event::Start(element) => {
                open_element(&element, depth, &mut seen_root, &mut current)?;
                depth += 1;
            }
            Event::Empty(element) => {
                open_element(&element, depth, &mut seen_root, &mut current)?;
                close_element(depth, &mut current, &mut records, &mut skipped);
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::new("closing tag without an open element"))?;
                close_element(depth, &mut current, &mut records, &mut skipped);
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::new(e.to_string()))?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(ParseError::new("text outside the root element"));
                    }
                } else if let Some(entry) = current.as_mut() {
                    entry.push_text(&text, depth);
                }
            }
            Event::CData(data) => {
                if let Some(entry) = current.as_mut() {
                    entry.push_text(&String::from_utf8_lossy(&data), depth);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::new(format!(
            "unexpected end of document: {depth} element(s) left open"
        )));
    }
    if !seen_root {
        return Err(ParseError::new("no root element found"));
    }

    debug!(oem = records.len(), skipped, "Parsed driver listing");
    Ok(records)
}

fn open_element(
    element: &BytesStart<'_>,
    depth: usize,
    seen_root: &mut bool,
    current: &mut Option<DriverEntry>,
) -> Result<(), ParseError> {
    if depth == 0 {
        if *seen_root {
            return Err(ParseError::new("junk after document element"));
        }
        *seen_root = true;
    }

    // Surfaces malformed attributes anywhere in the document.
    for attr in element.attributes() {
        attr.map_err(|e| ParseError::new(e.to_string()))?;
    }

    match current.as_mut() {
        Some(entry) => entry.open_child(element, depth)?,
        None if element.local_name().as_ref() == DRIVER_TAG => {
            let name = attribute(element, DRIVER_NAME_ATTR)?.unwrap_or_default();
            *current = Some(DriverEntry::new(depth, name));
        }
        None => {}
    }
    Ok(())
}

fn close_element(
    depth: usize,
    current: &mut Option<DriverEntry>,
    records: &mut Vec<DriverRecord>,
    skipped: &mut usize,
) {
    let Some(entry) = current.as_mut() else {
        return;
    };

    if depth != entry.depth {
        entry.close_child(depth);
        return;
    }

    if let Some(entry) = current.take() {
        let record = entry.into_record();
        if record.origin == DriverOrigin::Oem {
            records.push(record);
        } else {
            *skipped += 1;
        }
    }
}

/// Look up an attribute by local name (case-insensitive) and unescape it.
fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ParseError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ParseError::new(e.to_string()))?;
        if attr.key.local_name().as_ref().eq_ignore_ascii_case(name) {
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::new(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// A declared device count: ASCII digits only, must fit in `u32`.
fn parse_count(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn or_not_available(value: Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
