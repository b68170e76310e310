//! Return document assembly
//!
//! Turns the documents of a session into the nested filing document:
//! documents grouped by counterparty, a classification-code summary and a
//! document-range summary, plus the fixed submission metadata.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::validate::is_valid_gstin;
use crate::config::RangeOrdering;
use crate::domain::hsn::is_service_code;
use crate::domain::result::{Error, Result};
use crate::domain::return_doc::{
    B2bEntry, CdnrEntry, DocDetail, DocIssue, DocRange, HsnEntry, HsnSection, InvoiceEntry,
    ItemEntry, NoteEntry,
};
use crate::domain::{CodeHierarchy, Document, DocumentKind, NoteType, ReturnDocument};

/// Schema version stamped on every generated document
pub const RETURN_VERSION: &str = "GST3.1.6";

/// Filing type for a regular monthly return
pub const FILING_TYPE: &str = "M";

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])\d{4}$").expect("valid period pattern"));

/// Builds [`ReturnDocument`]s from documents
#[derive(Debug, Clone)]
pub struct ReturnAssembler {
    range_ordering: RangeOrdering,
    codes: &'static CodeHierarchy,
}

impl ReturnAssembler {
    pub fn new(range_ordering: RangeOrdering) -> Self {
        Self {
            range_ordering,
            codes: CodeHierarchy::builtin(),
        }
    }

    /// Assemble a return dated today
    pub fn assemble(&self, gstin: &str, period: &str, documents: &[Document]) -> Result<ReturnDocument> {
        let today = chrono::Local::now().date_naive();
        self.assemble_on(gstin, period, documents, today)
    }

    /// Assemble a return with an explicit generation date
    pub fn assemble_on(
        &self,
        gstin: &str,
        period: &str,
        documents: &[Document],
        filed_on: NaiveDate,
    ) -> Result<ReturnDocument> {
        let gstin = gstin.trim().to_uppercase();
        if !is_valid_gstin(&gstin) {
            return Err(Error::invalid_export(format!("supplier GSTIN {} is not valid", gstin)));
        }
        let period = period.trim();
        if !PERIOD_RE.is_match(period) {
            return Err(Error::invalid_export(format!(
                "filing period {} must be MMYYYY",
                period
            )));
        }

        let invoices: Vec<&Document> =
            documents.iter().filter(|d| d.kind() == DocumentKind::B2b).collect();
        let notes: Vec<&Document> =
            documents.iter().filter(|d| d.kind() == DocumentKind::Cdnr).collect();

        let b2b = build_b2b(&invoices);
        let cdnr = build_cdnr(&notes);
        let hsn = self.build_hsn(documents);
        let doc_issue = self.build_doc_issue(&invoices, &notes);

        info!(
            invoices = invoices.len(),
            notes = notes.len(),
            hsn_rows = hsn.as_ref().map_or(0, |h| h.data.len()),
            "Return document assembled"
        );

        Ok(ReturnDocument {
            gstin,
            fp: period.to_string(),
            version: RETURN_VERSION.to_string(),
            hash: "hash".to_string(),
            gt: Decimal::ZERO,
            cur_gt: Decimal::ZERO,
            fil_typ: FILING_TYPE.to_string(),
            fil_dt: filed_on.format("%d-%m-%Y").to_string(),
            b2b,
            cdnr,
            hsn,
            doc_issue,
        })
    }

    /// One summary row per (code, rate), sorted and numbered from 1
    fn build_hsn(&self, documents: &[Document]) -> Option<HsnSection> {
        let mut groups: BTreeMap<(String, Decimal), HsnEntry> = BTreeMap::new();
        let mut uncoded = 0usize;

        for line in documents.iter().flat_map(|d| &d.lines) {
            let Some(code) = line.hsn_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
            else {
                uncoded += 1;
                continue;
            };
            let service = is_service_code(code);

            let entry = groups
                .entry((code.to_string(), line.rate.normalize()))
                .or_insert_with(|| HsnEntry {
                    num: 0,
                    hsn_sc: code.to_string(),
                    desc: self
                        .codes
                        .describe(code)
                        .or_else(|| line.description.clone())
                        .unwrap_or_default(),
                    uqc: line
                        .unit
                        .clone()
                        .unwrap_or_else(|| if service { "NA" } else { "NOS" }.to_string()),
                    qty: Decimal::ZERO,
                    rt: line.rate,
                    txval: Decimal::ZERO,
                    iamt: Decimal::ZERO,
                    camt: Decimal::ZERO,
                    samt: Decimal::ZERO,
                    csamt: Decimal::ZERO,
                });

            if !service {
                entry.qty += line.quantity.unwrap_or(Decimal::ZERO);
            }
            entry.txval += line.taxable_value;
            entry.iamt += line.igst_amount;
            entry.camt += line.cgst_amount;
            entry.samt += line.sgst_amount;
            entry.csamt += line.cess_amount;
        }

        if uncoded > 0 {
            debug!(lines = uncoded, "Lines without a classification code left out of summary");
        }
        if groups.is_empty() {
            return None;
        }

        let data = groups
            .into_values()
            .zip(1u32..)
            .map(|(mut entry, num)| {
                entry.num = num;
                entry
            })
            .collect();
        Some(HsnSection { data })
    }

    fn build_doc_issue(&self, invoices: &[&Document], notes: &[&Document]) -> Option<DocIssue> {
        let numbers = |docs: &[&Document], note_type: Option<NoteType>| -> Vec<String> {
            docs.iter()
                .filter(|d| note_type.is_none() || d.header.note_type == note_type)
                .map(|d| d.header.number.clone())
                .collect()
        };

        let details = [
            (1, "Invoices for outward supply", numbers(invoices, None)),
            (4, "Debit Note", numbers(notes, Some(NoteType::Debit))),
            (5, "Credit Note", numbers(notes, Some(NoteType::Credit))),
        ];

        let doc_det: Vec<DocDetail> = details
            .into_iter()
            .filter(|(_, _, numbers)| !numbers.is_empty())
            .map(|(doc_num, doc_typ, numbers)| DocDetail {
                doc_num,
                doc_typ: doc_typ.to_string(),
                docs: self.ranges(numbers),
            })
            .collect();

        (!doc_det.is_empty()).then_some(DocIssue { doc_det })
    }

    /// One range per series; a series is the number minus trailing digits
    fn ranges(&self, numbers: Vec<String>) -> Vec<DocRange> {
        let mut series: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for number in numbers {
            let prefix = number.trim_end_matches(|c: char| c.is_ascii_digit()).to_string();
            series.entry(prefix).or_default().push(number);
        }

        series
            .into_values()
            .zip(1u32..)
            .filter_map(|(mut numbers, num)| {
                match self.range_ordering {
                    RangeOrdering::Lexical => numbers.sort(),
                    RangeOrdering::Natural => numbers.sort_by(|a, b| natural_cmp(a, b)),
                }
                let totnum = numbers.len() as u32;
                let from = numbers.first()?.clone();
                let to = numbers.last()?.clone();
                Some(DocRange {
                    num,
                    from,
                    to,
                    totnum,
                    cancel: 0,
                    net_issue: totnum,
                })
            })
            .collect()
    }
}

fn item_entries(document: &Document) -> Vec<ItemEntry> {
    document.lines.iter().map(ItemEntry::from_line).collect()
}

fn reverse_charge_flag(document: &Document) -> String {
    if document.header.reverse_charge { "Y" } else { "N" }.to_string()
}

/// Invoices grouped by counterparty, counterparties sorted
fn build_b2b(invoices: &[&Document]) -> Vec<B2bEntry> {
    let mut groups: BTreeMap<&str, Vec<InvoiceEntry>> = BTreeMap::new();
    for doc in invoices {
        groups
            .entry(doc.header.counterparty_gstin.as_str())
            .or_default()
            .push(InvoiceEntry {
                inum: doc.header.number.clone(),
                idt: doc.header.date.clone(),
                val: doc.header.value,
                pos: doc.header.place_of_supply.clone(),
                rchrg: reverse_charge_flag(doc),
                inv_typ: doc.header.invoice_type.clone(),
                itms: item_entries(doc),
            });
    }

    groups
        .into_iter()
        .map(|(ctin, inv)| B2bEntry {
            ctin: ctin.to_string(),
            inv,
        })
        .collect()
}

/// Notes grouped by counterparty, counterparties sorted
fn build_cdnr(notes: &[&Document]) -> Vec<CdnrEntry> {
    let mut groups: BTreeMap<&str, Vec<NoteEntry>> = BTreeMap::new();
    for doc in notes {
        groups
            .entry(doc.header.counterparty_gstin.as_str())
            .or_default()
            .push(NoteEntry {
                ntty: doc.header.note_type.unwrap_or(NoteType::Credit),
                nt_num: doc.header.number.clone(),
                nt_dt: doc.header.date.clone(),
                val: doc.header.value,
                pos: doc.header.place_of_supply.clone(),
                rchrg: reverse_charge_flag(doc),
                inv_typ: doc.header.invoice_type.clone(),
                itms: item_entries(doc),
            });
    }

    groups
        .into_iter()
        .map(|(ctin, nt)| CdnrEntry {
            ctin: ctin.to_string(),
            nt,
        })
        .collect()
}

/// Compare strings with digit runs ordered by numeric value
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);
    loop {
        match (left.chars().next(), right.chars().next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (l_run, l_rest) = split_digits(left);
                let (r_run, r_rest) = split_digits(right);
                let l_num = l_run.trim_start_matches('0');
                let r_num = r_run.trim_start_matches('0');
                let ord = l_num.len().cmp(&r_num.len()).then_with(|| l_num.cmp(r_num));
                if ord != Ordering::Equal {
                    return ord;
                }
                left = l_rest;
                right = r_rest;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left = &left[x.len_utf8()..];
                right = &right[y.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentHeader, LineItem};

    const SUPPLIER: &str = "27AAPFU0939F1ZV";

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn filed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()
    }

    fn document(kind: DocumentKind, ctin: &str, number: &str, lines: Vec<LineItem>) -> Document {
        let header = DocumentHeader {
            kind,
            counterparty_gstin: ctin.to_string(),
            receiver_name: None,
            number: number.to_string(),
            date: "15-01-2024".to_string(),
            value: lines.iter().map(LineItem::line_total).sum(),
            place_of_supply: "29".to_string(),
            reverse_charge: false,
            invoice_type: "R".to_string(),
            note_type: match kind {
                DocumentKind::B2b => None,
                DocumentKind::Cdnr => Some(NoteType::Credit),
            },
        };
        Document::from_parts(header, lines)
    }

    fn goods_line(code: &str, qty: &str) -> LineItem {
        let mut line = LineItem::new(d("18"), d("10000"));
        line.igst_amount = d("1800");
        line.hsn_code = Some(code.to_string());
        line.quantity = Some(d(qty));
        line
    }

    fn service_line(code: &str) -> LineItem {
        let mut line = LineItem::new(d("18"), d("5000"));
        line.cgst_amount = d("450");
        line.sgst_amount = d("450");
        line.hsn_code = Some(code.to_string());
        line.quantity = Some(d("3"));
        line
    }

    fn assembler() -> ReturnAssembler {
        ReturnAssembler::new(RangeOrdering::Lexical)
    }

    #[test]
    fn test_line_numbering_and_field_omission() {
        let docs = vec![document(
            DocumentKind::B2b,
            "29AABCT1332L1ZU",
            "INV-1",
            vec![goods_line("84713010", "2")],
        )];
        let ret = assembler().assemble_on(SUPPLIER, "012024", &docs, filed()).unwrap();
        let json = serde_json::to_value(&ret).unwrap();

        let item = &json["b2b"][0]["inv"][0]["itms"][0];
        assert_eq!(item["num"], 1801);
        assert_eq!(item["itm_det"]["iamt"], 1800);
        assert_eq!(item["itm_det"]["csamt"], 0);
        assert!(item["itm_det"].get("camt").is_none());
        assert!(json.get("cdnr").is_none());
        assert_eq!(json["fil_typ"], "M");
        assert_eq!(json["fil_dt"], "11-02-2024");
        assert_eq!(json["gt"], 0);
    }

    #[test]
    fn test_hsn_summary_forces_service_quantity_to_zero() {
        let docs = vec![
            document(DocumentKind::B2b, "29AABCT1332L1ZU", "INV-1", vec![goods_line("84713010", "2")]),
            document(DocumentKind::B2b, "29AABCT1332L1ZU", "INV-2", vec![goods_line("84713010", "1")]),
            document(DocumentKind::B2b, "29AABCT1332L1ZU", "SRV-1", vec![service_line("998313")]),
        ];
        let ret = assembler().assemble_on(SUPPLIER, "012024", &docs, filed()).unwrap();
        let data = &ret.hsn.unwrap().data;

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].num, 1);
        assert_eq!(data[0].hsn_sc, "84713010");
        assert_eq!(data[0].qty, d("3"));
        assert_eq!(data[0].txval, d("20000"));
        assert_eq!(data[0].uqc, "NOS");
        assert_eq!(data[0].desc, "Personal computer (laptop, notebook, palmtop)");

        assert_eq!(data[1].hsn_sc, "998313");
        assert_eq!(data[1].qty, Decimal::ZERO);
        assert_eq!(data[1].uqc, "NA");
        assert_eq!(data[1].camt, d("450"));
    }

    #[test]
    fn test_counterparties_are_sorted() {
        let docs = vec![
            document(DocumentKind::B2b, "29AABCT1332L1ZU", "INV-1", vec![goods_line("8471", "1")]),
            document(DocumentKind::B2b, "27AAPFU0939F1ZV", "INV-2", vec![goods_line("8471", "1")]),
            document(DocumentKind::Cdnr, "29AABCT1332L1ZU", "CN-1", vec![goods_line("8471", "1")]),
        ];
        let ret = assembler().assemble_on(SUPPLIER, "012024", &docs, filed()).unwrap();

        assert_eq!(ret.b2b[0].ctin, "27AAPFU0939F1ZV");
        assert_eq!(ret.b2b[1].ctin, "29AABCT1332L1ZU");
        assert_eq!(ret.cdnr[0].nt[0].nt_num, "CN-1");
        assert_eq!(ret.cdnr[0].nt[0].ntty, NoteType::Credit);
    }

    #[test]
    fn test_document_ranges_per_series() {
        let docs: Vec<Document> = ["INV-9", "INV-10", "INV-11", "EXP-1"]
            .iter()
            .map(|n| document(DocumentKind::B2b, "29AABCT1332L1ZU", n, vec![goods_line("8471", "1")]))
            .chain(std::iter::once(document(
                DocumentKind::Cdnr,
                "29AABCT1332L1ZU",
                "CN-1",
                vec![goods_line("8471", "1")],
            )))
            .collect();

        let lexical = assembler().assemble_on(SUPPLIER, "012024", &docs, filed()).unwrap();
        let detail = &lexical.doc_issue.as_ref().unwrap().doc_det;
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0].doc_num, 1);
        assert_eq!(detail[0].docs[0].from, "EXP-1");
        assert_eq!(detail[0].docs[1].from, "INV-10");
        assert_eq!(detail[0].docs[1].to, "INV-9");
        assert_eq!(detail[0].docs[1].totnum, 3);
        assert_eq!(detail[0].docs[1].net_issue, 3);
        assert_eq!(detail[1].doc_num, 5);

        let natural = ReturnAssembler::new(RangeOrdering::Natural)
            .assemble_on(SUPPLIER, "012024", &docs, filed())
            .unwrap();
        let series = &natural.doc_issue.unwrap().doc_det[0].docs[1];
        assert_eq!(series.from, "INV-9");
        assert_eq!(series.to, "INV-11");
    }

    #[test]
    fn test_invalid_export_inputs() {
        let err = assembler().assemble_on("BAD", "012024", &[], filed()).unwrap_err();
        assert!(matches!(err, Error::InvalidExport(_)));
        let err = assembler().assemble_on(SUPPLIER, "132024", &[], filed()).unwrap_err();
        assert!(matches!(err, Error::InvalidExport(_)));
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("INV-9", "INV-10"), Ordering::Less);
        assert_eq!(natural_cmp("A2B", "A10B"), Ordering::Less);
        assert_eq!(natural_cmp("INV-007", "INV-7"), Ordering::Less);
        assert_eq!(natural_cmp("B1", "A2"), Ordering::Greater);
    }
}
