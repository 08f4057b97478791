use database::model::person::Gender;
use strum_macros::{Display, EnumString};

/// UI languages the language toggle switches between
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    En,
    Th,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    FormAndTable,
    Title,
    Firstname,
    Lastname,
    Birthday,
    Nationality,
    CitizenId,
    Gender,
    Male,
    Female,
    Unisex,
    MobilePhone,
    PassportNo,
    ExpectedSalary,
    Reset,
    Submit,
    SelectAll,
    Delete,
    Edit,
    Manage,
    Name,
    /// Takes `{{total}}`
    TotalItems,
}

impl Key {
    pub fn for_gender(gender: Gender) -> Key {
        match gender {
            Gender::Male => Key::Male,
            Gender::Female => Key::Female,
            Gender::Unisex => Key::Unisex,
        }
    }
}

pub fn translate(locale: Locale, key: Key) -> &'static str {
    match locale {
        Locale::En => english(key),
        Locale::Th => thai(key),
    }
}

/// Fills `{{name}}` placeholders of a translated string
pub fn translate_with(locale: Locale, key: Key, values: &[(&str, String)]) -> String {
    values
        .iter()
        .fold(translate(locale, key).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
}

fn english(key: Key) -> &'static str {
    match key {
        Key::FormAndTable => "Form & Table",
        Key::Title => "Title",
        Key::Firstname => "Firstname",
        Key::Lastname => "Lastname",
        Key::Birthday => "Birthday",
        Key::Nationality => "Nationality",
        Key::CitizenId => "CitizenID",
        Key::Gender => "Gender",
        Key::Male => "Male",
        Key::Female => "Female",
        Key::Unisex => "Unisex",
        Key::MobilePhone => "Mobile Phone",
        Key::PassportNo => "Passport No",
        Key::ExpectedSalary => "Expected Salary",
        Key::Reset => "RESET",
        Key::Submit => "SUBMIT",
        Key::SelectAll => "Select All",
        Key::Delete => "DELETE",
        Key::Edit => "EDIT",
        Key::Manage => "MANAGE",
        Key::Name => "Name",
        Key::TotalItems => "Total {{total}} items",
    }
}

fn thai(key: Key) -> &'static str {
    match key {
        Key::FormAndTable => "แบบฟอร์มและตาราง",
        Key::Title => "คำนำหน้า",
        Key::Firstname => "ชื่อ",
        Key::Lastname => "นามสกุล",
        Key::Birthday => "วันเกิด",
        Key::Nationality => "สัญชาติ",
        Key::CitizenId => "เลขบัตรประชาชน",
        Key::Gender => "เพศ",
        Key::Male => "ชาย",
        Key::Female => "หญิง",
        Key::Unisex => "ไม่ระบุ",
        Key::MobilePhone => "เบอร์โทรศัพท์",
        Key::PassportNo => "เลขที่หนังสือเดินทาง",
        Key::ExpectedSalary => "เงินเดือนที่คาดหวัง",
        Key::Reset => "รีเซ็ต",
        Key::Submit => "ส่งข้อมูล",
        Key::SelectAll => "เลือกทั้งหมด",
        Key::Delete => "ลบ",
        Key::Edit => "แก้ไข",
        Key::Manage => "จัดการ",
        Key::Name => "ชื่อ",
        Key::TotalItems => "ทั้งหมด {{total}} รายการ",
    }
}
