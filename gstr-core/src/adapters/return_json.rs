//! Previously exported return documents
//!
//! Amounts in the file are trusted; only the document totals are
//! recomputed from the items. Items carry no classification, so code, unit
//! and description are taken back from the HSN summary where a rate has a
//! single summary entry. Quantity is restored only when that rate is also
//! carried by a single item in the whole return; otherwise it stays empty.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::return_doc::{HsnEntry, ItemEntry, ReturnDocument};
use crate::domain::{Document, DocumentHeader, DocumentKind, LineItem};

/// Parse a return document and keep the documents of `kind`
pub fn read_documents(bytes: &[u8], kind: DocumentKind) -> Result<Vec<Document>> {
    let doc: ReturnDocument = serde_json::from_slice(bytes)?;
    Ok(documents_of_kind(&doc, kind))
}

/// HSN summary entries that map back to items unambiguously
struct Classifier<'a> {
    by_rate: HashMap<Decimal, &'a HsnEntry>,
    items_per_rate: HashMap<Decimal, usize>,
}

impl<'a> Classifier<'a> {
    fn new(doc: &'a ReturnDocument) -> Self {
        let mut entries: HashMap<Decimal, Option<&HsnEntry>> = HashMap::new();
        for entry in doc.hsn.iter().flat_map(|h| h.data.iter()) {
            entries
                .entry(entry.rt.normalize())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(entry));
        }

        let mut items_per_rate = HashMap::new();
        let items = doc
            .b2b
            .iter()
            .flat_map(|b| b.inv.iter().flat_map(|i| i.itms.iter()))
            .chain(doc.cdnr.iter().flat_map(|c| c.nt.iter().flat_map(|n| n.itms.iter())));
        for item in items {
            *items_per_rate.entry(item.itm_det.rt.normalize()).or_insert(0) += 1;
        }

        Self {
            by_rate: entries
                .into_iter()
                .filter_map(|(rate, entry)| entry.map(|e| (rate, e)))
                .collect(),
            items_per_rate,
        }
    }

    fn line(&self, item: &ItemEntry) -> LineItem {
        let mut line = item.to_line();
        let rate = line.rate.normalize();
        let Some(entry) = self.by_rate.get(&rate) else {
            return line;
        };

        line.hsn_code = Some(entry.hsn_sc.clone());
        line.unit = Some(entry.uqc.clone()).filter(|u| !u.is_empty());
        line.description = Some(entry.desc.clone()).filter(|d| !d.is_empty());
        if self.items_per_rate.get(&rate) == Some(&1) {
            line.quantity = Some(entry.qty);
        }
        line
    }

    fn lines(&self, items: &[ItemEntry]) -> Vec<LineItem> {
        items.iter().map(|item| self.line(item)).collect()
    }
}

/// Convert one section of a return document back into documents
pub fn documents_of_kind(doc: &ReturnDocument, kind: DocumentKind) -> Vec<Document> {
    let classifier = Classifier::new(doc);
    match kind {
        DocumentKind::B2b => doc
            .b2b
            .iter()
            .flat_map(|entry| {
                entry.inv.iter().map(|inv| {
                    let header = DocumentHeader {
                        kind,
                        counterparty_gstin: entry.ctin.clone(),
                        receiver_name: None,
                        number: inv.inum.clone(),
                        date: inv.idt.clone(),
                        value: inv.val,
                        place_of_supply: inv.pos.clone(),
                        reverse_charge: inv.rchrg == "Y",
                        invoice_type: inv.inv_typ.clone(),
                        note_type: None,
                    };
                    Document::from_parts(header, classifier.lines(&inv.itms))
                })
            })
            .collect(),
        DocumentKind::Cdnr => doc
            .cdnr
            .iter()
            .flat_map(|entry| {
                entry.nt.iter().map(|note| {
                    let header = DocumentHeader {
                        kind,
                        counterparty_gstin: entry.ctin.clone(),
                        receiver_name: None,
                        number: note.nt_num.clone(),
                        date: note.nt_dt.clone(),
                        value: note.val,
                        place_of_supply: note.pos.clone(),
                        reverse_charge: note.rchrg == "Y",
                        invoice_type: note.inv_typ.clone(),
                        note_type: Some(note.ntty),
                    };
                    Document::from_parts(header, classifier.lines(&note.itms))
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::NoteType;

    const RETURN: &str = r#"{
        "gstin": "27AAPFU0939F1ZV", "fp": "012024",
        "b2b": [{"ctin": "29AABCT1332L1ZU", "inv": [{
            "inum": "INV-1", "idt": "15-01-2024", "val": 11800, "pos": "29", "rchrg": "N",
            "itms": [{"num": 1801, "itm_det": {"txval": 10000, "rt": 18, "iamt": 1800, "csamt": 0}}]
        }]}],
        "cdnr": [{"ctin": "29AABCT1332L1ZU", "nt": [{
            "ntty": "C", "nt_num": "CN-1", "nt_dt": "20-01-2024", "val": 1180, "pos": "29",
            "rchrg": "N", "inv_typ": "R",
            "itms": [{"num": 1801, "itm_det": {"txval": 1000, "rt": 18, "iamt": 180, "csamt": 0}}]
        }]}]
    }"#;

    #[test]
    fn test_invoices_from_b2b_section() {
        let docs = read_documents(RETURN.as_bytes(), DocumentKind::B2b).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].header.number, "INV-1");
        assert_eq!(docs[0].header.invoice_type, "R");
        assert_eq!(docs[0].totals.igst_amount, Decimal::new(1800, 0));
        assert_eq!(docs[0].header.value, Decimal::new(11800, 0));
    }

    #[test]
    fn test_notes_from_cdnr_section() {
        let docs = read_documents(RETURN.as_bytes(), DocumentKind::Cdnr).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].header.note_type, Some(NoteType::Credit));
        assert_eq!(docs[0].kind(), DocumentKind::Cdnr);
    }

    #[test]
    fn test_classification_restored_from_hsn_summary() {
        let text = r#"{
            "gstin": "27AAPFU0939F1ZV", "fp": "012024",
            "b2b": [{"ctin": "29AABCT1332L1ZU", "inv": [{
                "inum": "INV-1", "idt": "15-01-2024", "val": 12390, "pos": "29", "rchrg": "N",
                "itms": [
                    {"num": 1801, "itm_det": {"txval": 10000, "rt": 18, "iamt": 1800, "csamt": 0}},
                    {"num": 501, "itm_det": {"txval": 400, "rt": 5, "iamt": 20, "csamt": 0}},
                    {"num": 501, "itm_det": {"txval": 100, "rt": 5, "iamt": 5, "csamt": 0}}
                ]
            }]}],
            "hsn": {"data": [
                {"num": 1, "hsn_sc": "84713010", "desc": "Laptop", "uqc": "NOS", "qty": 2,
                 "rt": 18, "txval": 10000, "iamt": 1800, "camt": 0, "samt": 0, "csamt": 0},
                {"num": 2, "hsn_sc": "0401", "desc": "", "uqc": "LTR", "qty": 10,
                 "rt": 5, "txval": 400, "iamt": 20, "camt": 0, "samt": 0, "csamt": 0},
                {"num": 3, "hsn_sc": "0402", "desc": "", "uqc": "KGS", "qty": 1,
                 "rt": 5, "txval": 100, "iamt": 5, "camt": 0, "samt": 0, "csamt": 0}
            ]}
        }"#;

        let docs = read_documents(text.as_bytes(), DocumentKind::B2b).unwrap();
        let lines = &docs[0].lines;

        assert_eq!(lines[0].hsn_code.as_deref(), Some("84713010"));
        assert_eq!(lines[0].unit.as_deref(), Some("NOS"));
        assert_eq!(lines[0].description.as_deref(), Some("Laptop"));
        assert_eq!(lines[0].quantity, Some(Decimal::new(2, 0)));

        // Two summary entries share rate 5, so neither can be assigned
        assert_eq!(lines[1].hsn_code, None);
        assert_eq!(lines[2].quantity, None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(read_documents(b"{\"gstin\": 1", DocumentKind::B2b).is_err());
    }
}
