//! Common test helpers shared across the integration suite.

#![allow(dead_code)]

use shelflink::extractor::MARCXML_NS;
use std::io::{self, Read};

/// Builds the XML text of one `<record>` element.
#[derive(Debug, Default)]
pub struct RecordXml {
    body: String,
}

impl RecordXml {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control_number(mut self, id: &str) -> Self {
        self.body
            .push_str(&format!(r#"<controlfield tag="001">{id}</controlfield>"#));
        self
    }

    pub fn call_number(self, tag: &str, class: &str, item: Option<&str>) -> Self {
        let mut subfields = vec![('a', class)];
        if let Some(item) = item {
            subfields.push(('b', item));
        }
        self.datafield(tag, &subfields)
    }

    pub fn url(self, url: &str) -> Self {
        self.datafield("856", &[('u', url)])
    }

    pub fn datafield(mut self, tag: &str, subfields: &[(char, &str)]) -> Self {
        self.body
            .push_str(&format!(r#"<datafield tag="{tag}" ind1=" " ind2=" ">"#));
        for (code, value) in subfields {
            self.body
                .push_str(&format!(r#"<subfield code="{code}">{value}</subfield>"#));
        }
        self.body.push_str("</datafield>");
        self
    }

    pub fn build(&self) -> String {
        format!("<record>{}</record>", self.body)
    }
}

/// Wraps record elements in a MARCXML collection with the default namespace.
pub fn collection(records: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<collection xmlns="{MARCXML_NS}">
{}
</collection>
"#,
        records.join("\n")
    )
}

/// The XML for record `i` of a synthetic catalog.
pub fn synthetic_record(i: usize) -> String {
    let class = format!("QA{}", 76 + i % 50);
    let item = format!(".C{} {}", i % 97, 1950 + i % 70);
    RecordXml::new()
        .control_number(&format!("rec{i:06}"))
        .call_number("050", &class, Some(&item))
        .url(&format!("http://host{}.com/item/{i}", i % 13))
        .url(&format!("https://mirror.example.org/{i}"))
        .build()
}

/// A reader producing a synthetic catalog of `total` records on demand.
///
/// Record text is generated as it is read, so large documents can be
/// streamed without materializing them.
#[derive(Debug)]
pub struct SyntheticCatalog {
    total: usize,
    next: usize,
    pending: Vec<u8>,
    offset: usize,
    closed: bool,
}

impl SyntheticCatalog {
    pub fn new(total: usize) -> Self {
        let header = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><collection xmlns="{MARCXML_NS}">"#
        );
        Self {
            total,
            next: 0,
            pending: header.into_bytes(),
            offset: 0,
            closed: false,
        }
    }

    fn refill(&mut self) {
        self.offset = 0;
        if self.next < self.total {
            self.pending = synthetic_record(self.next).into_bytes();
            self.next += 1;
        } else if !self.closed {
            self.pending = b"</collection>".to_vec();
            self.closed = true;
        } else {
            self.pending.clear();
        }
    }
}

impl Read for SyntheticCatalog {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset >= self.pending.len() {
            self.refill();
            if self.pending.is_empty() {
                return Ok(0);
            }
        }
        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        Ok(n)
    }
}
