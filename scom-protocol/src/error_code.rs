//! Descriptions of the error codes a device returns in failed responses.

pub const UNKNOWN_ERROR_CODE: &str = "unknown error code";

/// Codes documented for the Xcom-232i gateway and the devices behind it,
/// including 0x002B for writes the gateway refuses.
static ERROR_CODES: [(u16, &str); 23] = [
    (0x0001, "invalid frame"),
    (0x0002, "device not found"),
    (0x0003, "response timeout"),
    (0x0011, "service not supported"),
    (0x0012, "invalid service argument"),
    (0x0013, "gateway busy"),
    (0x0021, "object type not supported"),
    (0x0022, "object id not found"),
    (0x0023, "property not supported"),
    (0x0024, "invalid data length"),
    (0x0025, "property is read only"),
    (0x0026, "invalid data"),
    (0x0027, "data too small"),
    (0x0028, "data too big"),
    (0x0029, "write property failed"),
    (0x002A, "read property failed"),
    (0x002B, "access denied"),
    (0x002C, "object not supported"),
    (0x002D, "multicast read not supported"),
    (0x002E, "object property invalid"),
    (0x002F, "file or directory not present"),
    (0x0030, "file corrupted"),
    (0x0081, "invalid shell argument"),
];

pub fn describe_error(code: u16) -> &'static str {
    ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(UNKNOWN_ERROR_CODE, |(_, description)| *description)
}

pub fn error_codes() -> &'static [(u16, &'static str)] {
    &ERROR_CODES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_error() {
        assert_eq!(describe_error(0x0001), "invalid frame");
        assert_eq!(describe_error(0x0022), "object id not found");
        assert_eq!(describe_error(0x002B), "access denied");
        assert_eq!(describe_error(0x0081), "invalid shell argument");
        assert_eq!(describe_error(0x0000), UNKNOWN_ERROR_CODE);
        assert_eq!(describe_error(0xFFFF), UNKNOWN_ERROR_CODE);
    }
}
