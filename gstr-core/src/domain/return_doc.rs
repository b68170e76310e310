//! Return document wire format
//!
//! Field names and omission rules are fixed by the receiving portal. The
//! same types are used to export and to re-import a previously built file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount;
use super::document::{LineItem, NoteType};
use super::rate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDocument {
    /// Supplier GSTIN
    pub gstin: String,
    /// Filing period, `MMYYYY`
    pub fp: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub hash: String,
    /// Aggregate turnover of the previous year (placeholder)
    #[serde(default, with = "amount")]
    pub gt: Decimal,
    /// Aggregate turnover of the current period (placeholder)
    #[serde(default, with = "amount")]
    pub cur_gt: Decimal,
    #[serde(default)]
    pub fil_typ: String,
    /// Generation date, `DD-MM-YYYY`
    #[serde(default)]
    pub fil_dt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub b2b: Vec<B2bEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cdnr: Vec<CdnrEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<HsnSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_issue: Option<DocIssue>,
}

/// Invoices issued to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2bEntry {
    pub ctin: String,
    pub inv: Vec<InvoiceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEntry {
    pub inum: String,
    pub idt: String,
    #[serde(with = "amount")]
    pub val: Decimal,
    pub pos: String,
    pub rchrg: String,
    #[serde(default = "regular")]
    pub inv_typ: String,
    pub itms: Vec<ItemEntry>,
}

/// Notes issued to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdnrEntry {
    pub ctin: String,
    pub nt: Vec<NoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub ntty: NoteType,
    pub nt_num: String,
    pub nt_dt: String,
    #[serde(with = "amount")]
    pub val: Decimal,
    pub pos: String,
    pub rchrg: String,
    #[serde(default = "regular")]
    pub inv_typ: String,
    pub itms: Vec<ItemEntry>,
}

fn regular() -> String {
    "R".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub num: u32,
    pub itm_det: ItemDetail,
}

/// Tax detail of one line; category amounts appear only when positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    #[serde(with = "amount")]
    pub txval: Decimal,
    #[serde(with = "amount")]
    pub rt: Decimal,
    #[serde(default, with = "amount::option", skip_serializing_if = "Option::is_none")]
    pub iamt: Option<Decimal>,
    #[serde(default, with = "amount::option", skip_serializing_if = "Option::is_none")]
    pub camt: Option<Decimal>,
    #[serde(default, with = "amount::option", skip_serializing_if = "Option::is_none")]
    pub samt: Option<Decimal>,
    #[serde(default, with = "amount")]
    pub csamt: Decimal,
}

/// `Some(amount)` only when it is strictly positive
pub fn positive(amount: Decimal) -> Option<Decimal> {
    (amount > Decimal::ZERO).then_some(amount)
}

impl ItemEntry {
    pub fn from_line(line: &LineItem) -> Self {
        Self {
            num: rate::item_number(line.rate),
            itm_det: ItemDetail {
                txval: line.taxable_value,
                rt: line.rate,
                iamt: positive(line.igst_amount),
                camt: positive(line.cgst_amount),
                samt: positive(line.sgst_amount),
                csamt: line.cess_amount,
            },
        }
    }

    /// Back to a line item; missing categories read as zero
    pub fn to_line(&self) -> LineItem {
        let det = &self.itm_det;
        let mut line = LineItem::new(det.rt, det.txval);
        line.igst_amount = det.iamt.unwrap_or(Decimal::ZERO);
        line.cgst_amount = det.camt.unwrap_or(Decimal::ZERO);
        line.sgst_amount = det.samt.unwrap_or(Decimal::ZERO);
        line.cess_amount = det.csamt;
        line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HsnSection {
    pub data: Vec<HsnEntry>,
}

/// One classification-code/rate summary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsnEntry {
    pub num: u32,
    pub hsn_sc: String,
    #[serde(default)]
    pub desc: String,
    pub uqc: String,
    #[serde(with = "amount")]
    pub qty: Decimal,
    #[serde(with = "amount")]
    pub rt: Decimal,
    #[serde(with = "amount")]
    pub txval: Decimal,
    #[serde(with = "amount")]
    pub iamt: Decimal,
    #[serde(with = "amount")]
    pub camt: Decimal,
    #[serde(with = "amount")]
    pub samt: Decimal,
    #[serde(with = "amount")]
    pub csamt: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocIssue {
    pub doc_det: Vec<DocDetail>,
}

/// Document ranges for one document type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocDetail {
    pub doc_num: u32,
    #[serde(default)]
    pub doc_typ: String,
    pub docs: Vec<DocRange>,
}

/// One numbering series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRange {
    pub num: u32,
    pub from: String,
    pub to: String,
    pub totnum: u32,
    pub cancel: u32,
    pub net_issue: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_categories_are_omitted_but_cess_is_kept() {
        let mut line = LineItem::new(Decimal::new(18, 0), Decimal::new(10000, 0));
        line.igst_amount = Decimal::new(1800, 0);

        let json = serde_json::to_value(ItemEntry::from_line(&line)).unwrap();
        assert_eq!(json["num"], 1801);
        assert_eq!(json["itm_det"]["iamt"], 1800);
        assert_eq!(json["itm_det"]["csamt"], 0);
        assert!(json["itm_det"].get("camt").is_none());
        assert!(json["itm_det"].get("samt").is_none());
    }

    #[test]
    fn test_item_entry_back_to_line() {
        let entry: ItemEntry = serde_json::from_str(
            r#"{"num":501,"itm_det":{"txval":200,"rt":5,"camt":5,"samt":5,"csamt":0}}"#,
        )
        .unwrap();
        let line = entry.to_line();
        assert_eq!(line.rate, Decimal::new(5, 0));
        assert_eq!(line.igst_amount, Decimal::ZERO);
        assert_eq!(line.line_total(), Decimal::new(210, 0));
    }

    #[test]
    fn test_positive_combinator() {
        assert_eq!(positive(Decimal::ZERO), None);
        assert_eq!(positive(Decimal::new(-1, 0)), None);
        assert_eq!(positive(Decimal::ONE), Some(Decimal::ONE));
    }
}
