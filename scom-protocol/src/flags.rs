/// Status bits carried in the frame flags byte of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFlags(pub u8);

impl FrameFlags {
    const MESSAGES_PENDING: u8 = 1 << 0;
    const RESET_OCCURRED: u8 = 1 << 1;
    const SD_CARD_PRESENT: u8 = 1 << 2;
    const SD_CARD_FULL: u8 = 1 << 3;
    const NEW_DATALOG_FILE: u8 = 1 << 4;
    const DATALOGGER_SUPPORTED: u8 = 1 << 5;

    fn is_set(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    pub fn messages_pending(self) -> bool {
        self.is_set(Self::MESSAGES_PENDING)
    }

    pub fn reset_occurred(self) -> bool {
        self.is_set(Self::RESET_OCCURRED)
    }

    pub fn sd_card_present(self) -> bool {
        self.is_set(Self::SD_CARD_PRESENT)
    }

    pub fn sd_card_full(self) -> bool {
        self.is_set(Self::SD_CARD_FULL)
    }

    pub fn new_datalog_file(self) -> bool {
        self.is_set(Self::NEW_DATALOG_FILE)
    }

    pub fn datalogger_supported(self) -> bool {
        self.is_set(Self::DATALOGGER_SUPPORTED)
    }

    /// Eight digit binary rendering, most significant bit first.
    pub fn to_binary(self) -> String {
        format!("{:08b}", self.0)
    }

    /// One sentence per status bit, starting with the least significant one.
    pub fn describe(self) -> [&'static str; 6] {
        [
            if self.messages_pending() {
                "Messages are pending."
            } else {
                "No messages are pending."
            },
            if self.reset_occurred() {
                "A reset or restart was carried out."
            } else {
                "No reset or restart was carried out."
            },
            if self.sd_card_present() {
                "The SD card is present."
            } else {
                "No SD card is present."
            },
            if self.sd_card_full() {
                "The SD card is full."
            } else {
                "The SD card is not full."
            },
            if self.new_datalog_file() {
                "New datalog file on the SD card."
            } else {
                "No new datalog file on the SD card."
            },
            if self.datalogger_supported() {
                "Datalogger is supported."
            } else {
                "Datalogger is not supported."
            },
        ]
    }
}
