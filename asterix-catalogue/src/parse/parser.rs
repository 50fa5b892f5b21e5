use quick_xml::events::Event;

use crate::parse::xml_model::DocumentXml;

/// Parses an XML definition document into the serde model.
///
/// The root element decides the document kind: `<Category>` for a category
/// definition, `<BDS>` for the shared register table. Anything else, and
/// any unrecognised element inside, is a deserialization error.
pub fn parse_document(xml: &str) -> Result<DocumentXml, quick_xml::DeError> {
    quick_xml::de::from_str(xml)
}

/// Name of the document's root element, if it has one.
///
/// Used to tell an unrecognised document kind apart from XML that is
/// malformed outright.
pub fn document_root(xml: &str) -> Option<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) | Ok(Event::Empty(start)) => {
                return Some(String::from_utf8_lossy(start.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
