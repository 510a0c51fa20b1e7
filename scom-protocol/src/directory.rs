//! Static directory of the objects the convenience entry points know about.

use crate::{Error, Format};

pub type ObjectId = u32;

/// Kind of object addressed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ObjectType {
    Info = 1,
    Parameter = 2,
    Message = 3,
    DatalogField = 5,
    DatalogTransfer = 257,
}

impl ObjectType {
    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            1 => Some(ObjectType::Info),
            2 => Some(ObjectType::Parameter),
            3 => Some(ObjectType::Message),
            5 => Some(ObjectType::DatalogField),
            257 => Some(ObjectType::DatalogTransfer),
            _ => None,
        }
    }
}

/// Facet of an object a request reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(pub u16);

impl PropertyId {
    pub const INVALID_ACTION: Self = Self(0);
    pub const VALUE: Self = Self(1);
    pub const STRING: Self = Self(1);
    pub const VALUE_QSP: Self = Self(5);
    pub const MIN_QSP: Self = Self(6);
    pub const MAX_QSP: Self = Self(7);
    pub const LEVEL_QSP: Self = Self(8);
    pub const UNSAVED_VALUE_QSP: Self = Self(13);
    pub const SD_START: Self = Self(21);
    pub const SD_DATABLOCK: Self = Self(22);
    pub const SD_ACK_CONTINUE: Self = Self(23);
    pub const SD_NACK_RETRY: Self = Self(24);
    pub const SD_ABORT: Self = Self(25);
    pub const SD_FINISH: Self = Self(26);
}

/// Read-only telemetry points.
pub mod info {
    use super::ObjectId;

    pub const BATTERY_VOLTAGE: ObjectId = 3000;
    pub const BATTERY_TEMPERATURE: ObjectId = 3001;
    pub const BATTERY_CHARGE_CURRENT: ObjectId = 3005;
    pub const BATTERY_VOLTAGE_RIPPLE: ObjectId = 3006;
    pub const STATE_OF_CHARGE: ObjectId = 3007;
    pub const INPUT_VOLTAGE: ObjectId = 3011;
    pub const INPUT_CURRENT: ObjectId = 3012;
    pub const BOOST_ACTIVE: ObjectId = 3019;
    pub const STATE_OF_TRANSFER_RELAY: ObjectId = 3020;
    pub const OUTPUT_VOLTAGE: ObjectId = 3021;
    pub const OUTPUT_CURRENT: ObjectId = 3022;
    pub const OPERATING_STATE: ObjectId = 3028;
    pub const STATE_OF_OUTPUT_RELAY: ObjectId = 3030;
    pub const STATE_OF_AUX_RELAY_1: ObjectId = 3031;
    pub const STATE_OF_AUX_RELAY_2: ObjectId = 3032;
    pub const STATE_OF_INVERTER: ObjectId = 3049;
    pub const NUMBER_OF_BATTERY_ELEMENTS: ObjectId = 3050;
    pub const STATE_OF_GROUND_RELAY: ObjectId = 3074;
    pub const STATE_OF_NEUTRAL_TRANSFER_RELAY: ObjectId = 3075;
    pub const INPUT_FREQUENCY: ObjectId = 3084;
    pub const OUTPUT_FREQUENCY: ObjectId = 3085;
    pub const STATE_OF_REMOTE_ENTRY: ObjectId = 3086;
    pub const INPUT_POWER: ObjectId = 3138;
    pub const OUTPUT_POWER: ObjectId = 3139;
}

/// Writable parameters.
pub mod param {
    use super::ObjectId;

    pub const MAXIMUM_CURRENT_OF_AC_SOURCE: ObjectId = 1107;
    pub const INVERTER_FREQUENCY: ObjectId = 1112;
    pub const INVERTER_ALLOWED: ObjectId = 1124;
    pub const CHARGER_ALLOWED: ObjectId = 1125;
    pub const SMART_BOOST_ALLOWED: ObjectId = 1126;
    pub const TRANSFER_RELAY_ALLOWED: ObjectId = 1128;
    pub const BATTERY_CHARGE_CURRENT: ObjectId = 1138;
    pub const AC_OUTPUT_VOLTAGE: ObjectId = 1286;
    pub const REMOTE_ENTRY_ACTIVE: ObjectId = 1545;
    pub const TYPE_OF_DETECTION_OF_GRID_LOSS: ObjectId = 1552;
    pub const LIMITATION_OF_THE_POWER_BOOST: ObjectId = 1607;
    pub const CHARGER_USES_ONLY_POWER_FROM_AC: ObjectId = 1646;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectEntry {
    pub id: ObjectId,
    pub name: &'static str,
    pub object_type: ObjectType,
    pub property_id: PropertyId,
    pub format: Format,
}

const fn info_entry(id: ObjectId, name: &'static str, format: Format) -> ObjectEntry {
    ObjectEntry {
        id,
        name,
        object_type: ObjectType::Info,
        property_id: PropertyId::VALUE,
        format,
    }
}

const fn param_entry(id: ObjectId, name: &'static str, format: Format) -> ObjectEntry {
    ObjectEntry {
        id,
        name,
        object_type: ObjectType::Parameter,
        property_id: PropertyId::VALUE_QSP,
        format,
    }
}

static DIRECTORY: [ObjectEntry; 36] = [
    info_entry(info::BATTERY_VOLTAGE, "battery voltage", Format::Float),
    info_entry(info::BATTERY_TEMPERATURE, "battery temperature", Format::Float),
    info_entry(info::BATTERY_CHARGE_CURRENT, "battery charge current", Format::Float),
    info_entry(info::BATTERY_VOLTAGE_RIPPLE, "battery voltage ripple", Format::Float),
    info_entry(info::STATE_OF_CHARGE, "state of charge", Format::Float),
    info_entry(info::INPUT_VOLTAGE, "input voltage", Format::Float),
    info_entry(info::INPUT_CURRENT, "input current", Format::Float),
    info_entry(info::BOOST_ACTIVE, "boost active", Format::ShortEnum),
    info_entry(info::STATE_OF_TRANSFER_RELAY, "state of transfer relay", Format::ShortEnum),
    info_entry(info::OUTPUT_VOLTAGE, "output voltage", Format::Float),
    info_entry(info::OUTPUT_CURRENT, "output current", Format::Float),
    info_entry(info::OPERATING_STATE, "operating state", Format::ShortEnum),
    info_entry(info::STATE_OF_OUTPUT_RELAY, "state of output relay", Format::ShortEnum),
    info_entry(info::STATE_OF_AUX_RELAY_1, "state of auxiliary relay 1", Format::ShortEnum),
    info_entry(info::STATE_OF_AUX_RELAY_2, "state of auxiliary relay 2", Format::ShortEnum),
    info_entry(info::STATE_OF_INVERTER, "state of inverter", Format::ShortEnum),
    info_entry(info::NUMBER_OF_BATTERY_ELEMENTS, "number of battery elements", Format::Float),
    info_entry(info::STATE_OF_GROUND_RELAY, "state of ground relay", Format::ShortEnum),
    info_entry(
        info::STATE_OF_NEUTRAL_TRANSFER_RELAY,
        "state of neutral transfer relay",
        Format::ShortEnum,
    ),
    info_entry(info::INPUT_FREQUENCY, "input frequency", Format::Float),
    info_entry(info::OUTPUT_FREQUENCY, "output frequency", Format::Float),
    info_entry(info::STATE_OF_REMOTE_ENTRY, "state of remote entry", Format::ShortEnum),
    info_entry(info::INPUT_POWER, "input power", Format::Float),
    info_entry(info::OUTPUT_POWER, "output power", Format::Float),
    param_entry(param::MAXIMUM_CURRENT_OF_AC_SOURCE, "maximum current of AC source", Format::Float),
    param_entry(param::INVERTER_FREQUENCY, "inverter frequency", Format::Float),
    param_entry(param::INVERTER_ALLOWED, "inverter allowed", Format::Bool),
    param_entry(param::CHARGER_ALLOWED, "charger allowed", Format::Bool),
    param_entry(param::SMART_BOOST_ALLOWED, "smart boost allowed", Format::Bool),
    param_entry(param::TRANSFER_RELAY_ALLOWED, "transfer relay allowed", Format::Bool),
    param_entry(param::BATTERY_CHARGE_CURRENT, "battery charge current", Format::Float),
    param_entry(param::AC_OUTPUT_VOLTAGE, "AC output voltage", Format::Float),
    param_entry(param::REMOTE_ENTRY_ACTIVE, "remote entry active", Format::LongEnum),
    param_entry(
        param::TYPE_OF_DETECTION_OF_GRID_LOSS,
        "type of detection of grid loss",
        Format::LongEnum,
    ),
    param_entry(
        param::LIMITATION_OF_THE_POWER_BOOST,
        "limitation of the power boost",
        Format::Float,
    ),
    param_entry(
        param::CHARGER_USES_ONLY_POWER_FROM_AC,
        "charger uses only power from AC",
        Format::Bool,
    ),
];

pub fn lookup(id: ObjectId) -> Result<&'static ObjectEntry, Error> {
    DIRECTORY
        .iter()
        .find(|entry| entry.id == id)
        .ok_or(Error::UnknownObject(id))
}

pub fn entries() -> &'static [ObjectEntry] {
    &DIRECTORY
}
