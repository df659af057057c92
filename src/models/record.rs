use serde::{Deserialize, Serialize};

/// Number of header rows at the top of the sheet.
pub const HEADER_ROWS: u32 = 1;

/// First row (1-based) that holds record data.
pub const FIRST_DATA_ROW: u32 = HEADER_ROWS + 1;

/// Column titles written into the header row.
pub const HEADER_ROW: [&str; Field::COUNT] = [
    "Sr No", "Company", "L1", "L2", "L3", "MR", "Location", "Mode", "Details",
];

/// One column of the record schema, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SerialNumber,
    Company,
    L1,
    L2,
    L3,
    Mr,
    Location,
    Mode,
    Details,
}

impl Field {
    pub const COUNT: usize = 9;

    pub const ALL: [Field; Field::COUNT] = [
        Field::SerialNumber,
        Field::Company,
        Field::L1,
        Field::L2,
        Field::L3,
        Field::Mr,
        Field::Location,
        Field::Mode,
        Field::Details,
    ];

    /// Zero-based column position in the sheet.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field name as used by forms and validation messages.
    pub fn name(self) -> &'static str {
        match self {
            Field::SerialNumber => "serialNumber",
            Field::Company => "company",
            Field::L1 => "l1",
            Field::L2 => "l2",
            Field::L3 => "l3",
            Field::Mr => "mr",
            Field::Location => "location",
            Field::Mode => "mode",
            Field::Details => "details",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Column title in the header row.
    pub fn label(self) -> &'static str {
        HEADER_ROW[self.index()]
    }
}

/// One logical row of the sheet.
///
/// `row_position` is the 1-based physical row in the sheet and is only ever
/// assigned from a fetch; records built from form input carry `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_position: Option<u32>,
    pub serial_number: String,
    pub company: String,
    pub l1: String,
    pub l2: String,
    pub l3: String,
    pub mr: String,
    pub location: String,
    pub mode: String,
    pub details: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::SerialNumber => &self.serial_number,
            Field::Company => &self.company,
            Field::L1 => &self.l1,
            Field::L2 => &self.l2,
            Field::L3 => &self.l3,
            Field::Mr => &self.mr,
            Field::Location => &self.location,
            Field::Mode => &self.mode,
            Field::Details => &self.details,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::SerialNumber => self.serial_number = value,
            Field::Company => self.company = value,
            Field::L1 => self.l1 = value,
            Field::L2 => self.l2 = value,
            Field::L3 => self.l3 = value,
            Field::Mr => self.mr = value,
            Field::Location => self.location = value,
            Field::Mode => self.mode = value,
            Field::Details => self.details = value,
        }
    }

    /// True when every data field is blank. A cleared row and a row that was
    /// never written look the same.
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).trim().is_empty())
    }
}
