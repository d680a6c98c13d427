//! USB descriptor constants for the emulated keyboard.
//!
//! The descriptor framework itself (device/configuration/interface/endpoint
//! enumeration) belongs to the transport collaborator.  What lives here are
//! the bytes the host must see for the 3-byte report format to be understood,
//! and the identity the emulated device presents.  They must match exactly:
//! hosts bind their keyboard driver based on them.

/// HID report descriptor: 8 modifier bits, 1 reserved byte, a 1-element
/// keycode array with usages 0x00–0x65.
pub const KEYBOARD_REPORT_DESCRIPTOR: [u8; 43] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    //
    //   - Key code (1 byte) -
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0x65, //   Usage Maximum (101)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x65, //   Logical Maximum (101)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];

/// Highest key usage the report descriptor admits.
pub const MAX_KEY_USAGE: u8 = 0x65;

/// HID class descriptor (type 0x21) announcing one report descriptor.
pub const HID_CLASS_DESCRIPTOR: [u8; 9] = [
    0x09, // bLength
    0x21, // bDescriptorType (HID)
    0x10, 0x01, // bcdHID 1.10
    0x00, // bCountryCode (not localized)
    0x01, // bNumDescriptors
    0x22, // bDescriptorType (Report)
    (KEYBOARD_REPORT_DESCRIPTOR.len() & 0xFF) as u8,
    (KEYBOARD_REPORT_DESCRIPTOR.len() >> 8) as u8,
];

/// USB interface class code for HID.
pub const INTERFACE_CLASS_HID: u8 = 0x03;

/// Interrupt-IN endpoint declaration for the keyboard interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptEndpoint {
    /// Endpoint number (direction IN).
    pub number: u8,
    /// Declared max packet size.  Reports are 3 bytes regardless.
    pub max_packet_size: u16,
    /// Polling interval in milliseconds (USB 2.0 Table 9-13, full speed).
    pub interval_ms: u8,
}

impl InterruptEndpoint {
    /// Endpoint used for bulk typing: poll every millisecond.
    pub const DEPLOY: InterruptEndpoint = InterruptEndpoint {
        number: 3,
        max_packet_size: 16384,
        interval_ms: 1,
    };

    /// Endpoint used for interactive sessions.
    pub const INTERACTIVE: InterruptEndpoint = InterruptEndpoint {
        number: 3,
        max_packet_size: 16384,
        interval_ms: 10,
    };

    /// Returns a copy with a different polling interval.
    pub const fn with_interval(self, interval_ms: u8) -> Self {
        Self {
            interval_ms,
            ..self
        }
    }
}

/// Identity strings and IDs presented during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub device_revision: u16,
    pub max_packet_size_ep0: u8,
    pub manufacturer: &'static str,
    pub product: &'static str,
    pub serial_number: &'static str,
    pub configuration: &'static str,
}

/// The identity of the MAX3420E enumeration firmware the emulated keyboard
/// impersonates.
pub const DEFAULT_IDENTITY: DeviceIdentity = DeviceIdentity {
    vendor_id: 0x610B,
    product_id: 0x4653,
    device_revision: 0x3412,
    max_packet_size_ep0: 64,
    manufacturer: "Maxim",
    product: "MAX3420E Enum Code",
    serial_number: "S/N3420E",
    configuration: "Emulated Keyboard",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_descriptor_matches_reference_bytes() {
        let expected: &[u8] = b"\x05\x01\x09\x06\xA1\x01\x05\x07\x19\xE0\x29\xE7\x15\x00\x25\x01\x75\x01\x95\x08\x81\x02\x95\x01\x75\x08\x81\x01\x19\x00\x29\x65\x15\x00\x25\x65\x75\x08\x95\x01\x81\x00\xC0";
        assert_eq!(&KEYBOARD_REPORT_DESCRIPTOR[..], expected);
    }

    #[test]
    fn test_hid_class_descriptor_matches_reference_bytes() {
        assert_eq!(
            HID_CLASS_DESCRIPTOR,
            [0x09, 0x21, 0x10, 0x01, 0x00, 0x01, 0x22, 0x2B, 0x00]
        );
    }

    #[test]
    fn test_key_usage_range_ends_at_max_key_usage() {
        // Usage Maximum of the key array is the byte after 0x29 in the last block.
        let pos = KEYBOARD_REPORT_DESCRIPTOR
            .windows(2)
            .rposition(|w| w[0] == 0x29)
            .expect("usage maximum present");
        assert_eq!(KEYBOARD_REPORT_DESCRIPTOR[pos + 1], MAX_KEY_USAGE);
    }

    #[test]
    fn test_endpoint_presets_differ_only_in_interval() {
        assert_eq!(
            InterruptEndpoint::DEPLOY.with_interval(10),
            InterruptEndpoint::INTERACTIVE
        );
    }
}
