// Copyright 2023 rust-dns-sdk authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Push-style mapping of service XML documents onto entity models.
//!
//! The mapper walks the document once, in order, keeping a stack of handlers. The handler on
//! top of the stack receives every leaf element (an element without child elements) together
//! with its text. A handler may open a nested handler from `start_element`; that nested handler
//! stays current until the element that opened it closes, and is then handed back to its parent
//! through `attach`.

use std::any::Any;
use std::collections::BTreeMap;
use quick_xml::events::Event;
use quick_xml::Reader;
use crate::error::{Error, Result};

/// Receives parse events for one entity.
pub trait XmlHandler: Any {
    /// Called when an element opens while this handler is current.
    ///
    /// Returning a handler makes it current until `name` closes.
    fn start_element(&mut self, _name: &str) -> Option<Box<dyn XmlHandler>> {
        None
    }

    /// Called with the text of every leaf element closed while this handler is current.
    fn end_element(&mut self, name: &str, value: &str) -> Result<()>;

    /// Receives a finished nested handler opened by `start_element`.
    fn attach(&mut self, _name: &str, _child: Box<dyn XmlHandler>) {}

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// An entity that can be the target of a parse.
pub trait XmlEntity: XmlHandler + Default {}

/// Constructor for the entity created at a marker element.
pub type Constructor = fn() -> Box<dyn XmlHandler>;

/// Element name paired with the entity created each time that element opens.
pub type Marker = (&'static str, Constructor);

fn new_entity<T: XmlEntity>() -> Box<dyn XmlHandler> {
    Box::new(T::default())
}

/// Builds a marker that creates a `T` at every `name` element.
pub fn marker<T: XmlEntity>(name: &'static str) -> Marker {
    (name, new_entity::<T>)
}

/// Entities collected at marker elements, in document order, plus the top-level leaf
/// elements found outside any marker.
pub struct ResultSet {
    markers: Vec<Marker>,
    items: Vec<(&'static str, Box<dyn XmlHandler>)>,
    fields: BTreeMap<String, String>,
}

impl ResultSet {
    pub fn new(markers: &[Marker]) -> Self {
        Self {
            markers: markers.to_vec(),
            items: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Value of a top-level leaf element such as `NextMarker`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_truncated(&self) -> bool {
        self.get("IsTruncated") == Some("true")
    }

    /// Marker names of the collected entities, in document order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.items.iter().map(|(key, _)| *key)
    }

    /// Consumes the set, keeping the entities of type `T` in document order.
    pub fn into_items<T: XmlEntity>(self) -> Vec<T> {
        self.items
            .into_iter()
            .filter_map(|(_, item)| item.into_any().downcast::<T>().ok())
            .map(|item| *item)
            .collect()
    }
}

impl XmlHandler for ResultSet {
    fn start_element(&mut self, name: &str) -> Option<Box<dyn XmlHandler>> {
        self.markers
            .iter()
            .find(|(marker, _)| *marker == name)
            .map(|(_, construct)| construct())
    }

    fn end_element(&mut self, name: &str, value: &str) -> Result<()> {
        self.fields.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn attach(&mut self, name: &str, child: Box<dyn XmlHandler>) {
        if let Some((marker, _)) = self.markers.iter().find(|(marker, _)| *marker == name) {
            self.items.push((*marker, child));
        }
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Parses a whole document into a single `T`.
pub fn parse_object<T: XmlEntity>(body: &str) -> Result<T> {
    let root = drive(body, Box::new(T::default()))?;
    root.into_any()
        .downcast::<T>()
        .map(|entity| *entity)
        .map_err(|_| Error::parse("root handler changed type during parse"))
}

/// Parses a document into the entities found at `markers`.
pub fn parse_list(body: &str, markers: &[Marker]) -> Result<ResultSet> {
    let root = drive(body, Box::new(ResultSet::new(markers)))?;
    root.into_any()
        .downcast::<ResultSet>()
        .map(|set| *set)
        .map_err(|_| Error::parse("root handler changed type during parse"))
}

struct Frame {
    handler: Box<dyn XmlHandler>,
    /// Element that opened this frame; `None` for the root.
    element: Option<String>,
    depth: usize,
}

struct Mapper {
    stack: Vec<Frame>,
    /// One entry per open element: whether it has child elements.
    open: Vec<bool>,
    text: String,
    seen_root: bool,
}

impl Mapper {
    fn new(root: Box<dyn XmlHandler>) -> Self {
        Self {
            stack: vec![Frame { handler: root, element: None, depth: 0 }],
            open: Vec::new(),
            text: String::new(),
            seen_root: false,
        }
    }

    fn start(&mut self, name: &str) -> Result<()> {
        if self.open.is_empty() && self.seen_root {
            return Err(Error::parse(format!("unexpected second root element <{}>", name)));
        }
        self.seen_root = true;
        if let Some(parent) = self.open.last_mut() {
            *parent = true;
        }
        self.open.push(false);
        self.text.clear();

        let depth = self.open.len();
        let Some(top) = self.stack.last_mut() else {
            return Err(Error::parse("handler stack is empty"));
        };
        if let Some(child) = top.handler.start_element(name) {
            self.stack.push(Frame {
                handler: child,
                element: Some(name.to_string()),
                depth,
            });
        }
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        let depth = self.open.len();
        let has_children = self
            .open
            .pop()
            .ok_or_else(|| Error::parse(format!("unexpected closing element </{}>", name)))?;

        let closes_frame = self
            .stack
            .last()
            .is_some_and(|top| top.depth == depth && top.element.as_deref() == Some(name));

        if closes_frame {
            if let Some(frame) = self.stack.pop() {
                if let Some(parent) = self.stack.last_mut() {
                    parent.handler.attach(name, frame.handler);
                }
            }
        } else if !has_children {
            if let Some(top) = self.stack.last_mut() {
                top.handler.end_element(name, &self.text)?;
            }
        }
        self.text.clear();
        Ok(())
    }

    fn finish(mut self) -> Result<Box<dyn XmlHandler>> {
        if !self.seen_root {
            return Err(Error::parse("document has no root element"));
        }
        if !self.open.is_empty() {
            return Err(Error::parse("unexpected end of document"));
        }
        if self.stack.len() != 1 {
            return Err(Error::parse("nested entity was never closed"));
        }
        self.stack
            .pop()
            .map(|frame| frame.handler)
            .ok_or_else(|| Error::parse("handler stack is empty"))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::parse(e.to_string()))
}

/// Runs the parse loop over `body`, returning the root handler once the document ends.
fn drive(body: &str, root: Box<dyn XmlHandler>) -> Result<Box<dyn XmlHandler>> {
    let mut reader = Reader::from_str(body);
    let mut mapper = Mapper::new(root);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                mapper.start(utf8(local.as_ref())?)?;
            }
            Event::Empty(e) => {
                let local = e.local_name();
                let name = utf8(local.as_ref())?;
                mapper.start(name)?;
                mapper.end(name)?;
            }
            Event::End(e) => {
                let local = e.local_name();
                mapper.end(utf8(local.as_ref())?)?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::parse(e.to_string()))?;
                mapper.text.push_str(&text);
            }
            Event::CData(e) => {
                mapper.text.push_str(utf8(&e)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    mapper.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug)]
    struct Leaf {
        fields: Vec<(String, String)>,
        children: Vec<Leaf>,
    }

    impl XmlHandler for Leaf {
        fn start_element(&mut self, name: &str) -> Option<Box<dyn XmlHandler>> {
            (name == "Child").then(|| Box::new(Leaf::default()) as Box<dyn XmlHandler>)
        }

        fn end_element(&mut self, name: &str, value: &str) -> Result<()> {
            self.fields.push((name.to_string(), value.to_string()));
            Ok(())
        }

        fn attach(&mut self, _name: &str, child: Box<dyn XmlHandler>) {
            if let Ok(child) = child.into_any().downcast::<Leaf>() {
                self.children.push(*child);
            }
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    impl XmlEntity for Leaf {}

    #[test]
    fn dispatches_leaves_in_document_order() {
        let doc = "<Root><A>1</A><Group><B>2</B><C/></Group><D></D></Root>";
        let leaf: Leaf = parse_object(doc).unwrap();
        let names: Vec<_> = leaf.fields.iter().map(|(n, v)| (n.as_str(), v.as_str())).collect();
        assert_eq!(names, vec![("A", "1"), ("B", "2"), ("C", ""), ("D", "")]);
    }

    #[test]
    fn nested_handler_owns_its_children() {
        let doc = "<Root><Id>outer</Id><Child><Id>inner</Id></Child><Tail>t</Tail></Root>";
        let leaf: Leaf = parse_object(doc).unwrap();
        assert_eq!(leaf.fields, vec![
            ("Id".to_string(), "outer".to_string()),
            ("Tail".to_string(), "t".to_string()),
        ]);
        assert_eq!(leaf.children.len(), 1);
        assert_eq!(leaf.children[0].fields, vec![("Id".to_string(), "inner".to_string())]);
    }

    #[test]
    fn strips_namespace_prefixes_and_unescapes_text() {
        let doc = r#"<r:Root xmlns:r="urn:x"><r:A>a &amp; b</r:A><B><![CDATA[<raw>]]></B></r:Root>"#;
        let leaf: Leaf = parse_object(doc).unwrap();
        assert_eq!(leaf.fields[0], ("A".to_string(), "a & b".to_string()));
        assert_eq!(leaf.fields[1], ("B".to_string(), "<raw>".to_string()));
    }

    #[test]
    fn list_parse_collects_markers_and_top_level_fields() {
        let doc = "<List><Items><Child><N>1</N></Child><Child><N>2</N></Child></Items>\
                   <IsTruncated>true</IsTruncated><NextMarker>m2</NextMarker></List>";
        let set = parse_list(doc, &[marker::<Leaf>("Child")]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.is_truncated());
        assert_eq!(set.get("NextMarker"), Some("m2"));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["Child", "Child"]);

        let items = set.into_items::<Leaf>();
        assert_eq!(items[0].fields[0].1, "1");
        assert_eq!(items[1].fields[0].1, "2");
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        for doc in ["<Root><A>1</B></Root>", "<Root><A>1</A>", "", "just text", "<A/><B/>"] {
            match parse_object::<Leaf>(doc) {
                Err(Error::Parse(_)) => {}
                other => panic!("expected parse error for {:?}, got {:?}", doc, other),
            }
        }
    }
}
