//! Value codec: SLOT lookup, sentinel-aware scaling and display.
//!
//! The tables are generated by `build.rs` from `build_core/var/slots.json` and
//! checked for duplicate ids there, so a missing id at runtime is a programmer error.
use crate::core::{ScaledValue, Sentinel, Slot};
use alloc::{format, string::String};

include!(concat!(env!("OUT_DIR"), "/generated_slots.rs"));

fn search(table: &'static [Slot], id: u16) -> Option<&'static Slot> {
    table
        .binary_search_by_key(&id, |slot| slot.id)
        .ok()
        .map(|index| &table[index])
}

impl Slot {
    /// SLOT from the general table.
    pub fn find(id: u16) -> Option<&'static Slot> {
        search(SLOTS, id)
    }

    /// SLOT from the general table.
    ///
    /// # Panics
    ///
    /// When `id` is not registered: the table is static, so this is a
    /// mismatch between a decoder and the generated data.
    pub fn lookup(id: u16) -> &'static Slot {
        match Self::find(id) {
            Some(slot) => slot,
            None => panic!("SLOT {} is not registered", id),
        }
    }

    /// SLOT from the scaled-test-result table (DM30), numbered independently.
    pub fn find_test_result(id: u16) -> Option<&'static Slot> {
        search(TEST_RESULT_SLOTS, id)
    }

    /// Convert a raw field into an engineering value.
    /// Sentinels are checked against the SLOT width before any arithmetic.
    pub fn scale(&self, raw: u64) -> ScaledValue {
        match Sentinel::classify(raw, self.bit_length) {
            Sentinel::NotAvailable => ScaledValue::NotAvailable,
            Sentinel::Error => ScaledValue::Error,
            Sentinel::Data => ScaledValue::Number(raw as f64 * self.scale_factor + self.offset),
        }
    }

    /// Number followed by the unit, using the SLOT display precision.
    pub fn format_number(&self, value: f64) -> String {
        let precision = self.precision as usize;
        if self.unit_label.is_empty() {
            format!("{:.*}", precision, value)
        } else {
            format!("{:.*} {}", precision, value, self.unit_label)
        }
    }

    /// Canonical rendering of a raw field: `"17.5 %"`, `"Error"` or `"Not Available"`.
    pub fn render(&self, raw: u64) -> String {
        match self.scale(raw) {
            ScaledValue::Number(value) => self.format_number(value),
            ScaledValue::Error => String::from("Error"),
            ScaledValue::NotAvailable => String::from("Not Available"),
        }
    }
}
