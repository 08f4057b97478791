use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::consts::consts::PersonId;

use super::citizen_id::{self, CitizenId};

/// A single entry of the person list, serialized with the field names the
/// durable slot has always used (`firstname`, `citizenId`, `expectedSalary`, ...)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub title: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(with = "birthday_format")]
    pub birthday: NaiveDate,
    pub nationality: Nationality,
    #[serde(default, deserialize_with = "citizen_id::deserialize_stored")]
    pub citizen_id: Option<CitizenId>,
    pub gender: Gender,
    pub mobile_phone: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub passport_no: Option<String>,
    #[serde(default)]
    pub expected_salary: ExpectedSalary,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    pub fn new_test(id: i64, firstname: &str) -> Self {
        Person {
            id: PersonId(id),
            title: "Ms.".to_string(),
            firstname: firstname.to_string(),
            lastname: "Tester".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            nationality: Nationality::British,
            citizen_id: None,
            gender: Gender::Female,
            mobile_phone: CountryCode::default().compose("812345678"),
            passport_no: None,
            expected_salary: ExpectedSalary(5000.0),
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Nationality {
    #[serde(alias = "american")]
    American,
    #[serde(alias = "canadian")]
    Canadian,
    #[serde(alias = "british")]
    British,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[serde(alias = "male")]
    Male,
    #[serde(alias = "female")]
    Female,
    #[serde(alias = "unisex")]
    Unisex,
}

/// Dialing prefixes offered next to the mobile phone input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, EnumIter)]
pub enum CountryCode {
    #[default]
    Thailand,
    UnitedStates,
    UnitedKingdom,
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown country code: {0}")]
pub struct UnknownCountryCode(pub String);

impl CountryCode {
    pub fn prefix(&self) -> &'static str {
        match self {
            CountryCode::Thailand => "+66",
            CountryCode::UnitedStates => "+1",
            CountryCode::UnitedKingdom => "+44",
        }
    }

    /// Stored phone numbers are the prefix directly followed by the local number
    pub fn compose(&self, local_number: &str) -> String {
        format!("{}{}", self.prefix(), local_number.trim())
    }

    /// Inverse of `compose`, `None` when the number carries no known prefix
    pub fn split(mobile_phone: &str) -> Option<(CountryCode, &str)> {
        CountryCode::iter().find_map(|code| {
            mobile_phone
                .strip_prefix(code.prefix())
                .map(|local_number| (code, local_number))
        })
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl std::str::FromStr for CountryCode {
    type Err = UnknownCountryCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('+');

        CountryCode::iter()
            .find(|code| code.prefix().trim_start_matches('+') == digits)
            .ok_or_else(|| UnknownCountryCode(s.to_string()))
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Expected salary is not a number: {0}")]
pub struct SalaryParseError(pub String);

/// Salary is kept numeric no matter how it was entered or stored
#[derive(Serialize, Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct ExpectedSalary(pub f64);

impl ExpectedSalary {
    /// Parses form input. Blank input reads as zero.
    pub fn parse(text: &str) -> Result<Self, SalaryParseError> {
        let trimmed = text.trim().replace(',', "");

        if trimmed.is_empty() {
            return Ok(ExpectedSalary(0.0));
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(ExpectedSalary(value)),
            _ => Err(SalaryParseError(text.to_string())),
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSalary {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ExpectedSalary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let salary = match Option::<StoredSalary>::deserialize(deserializer)? {
            None => ExpectedSalary(0.0),
            Some(StoredSalary::Number(value)) => ExpectedSalary(value),
            Some(StoredSalary::Text(text)) => ExpectedSalary::parse(&text).unwrap_or_else(|err| {
                log::warn!("{}, reading it as 0", err);
                ExpectedSalary(0.0)
            }),
        };

        Ok(salary)
    }
}

/// Birthday is written as a plain date. Older entries hold a full timestamp,
/// those are cut down to their date.
pub fn parse_birthday(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = text.trim();

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => DateTime::parse_from_rfc3339(trimmed).map(|timestamp| timestamp.date_naive()),
    }
}

mod birthday_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        super::parse_birthday(&text).map_err(de::Error::custom)
    }
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;

    Ok(text.filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn stored_person() -> serde_json::Value {
        json!({
            "id": 1,
            "title": "Ms.",
            "firstname": "Ann",
            "lastname": "Lee",
            "birthday": "1990-05-01",
            "nationality": "British",
            "citizenId": { "part1": "1", "part2": "2345", "part3": "67890", "part4": "12", "part5": "3" },
            "gender": "Female",
            "mobilePhone": "+66812345678",
            "passportNo": "AB123",
            "expectedSalary": 5000
        })
    }

    #[test]
    fn reads_the_stored_shape() {
        let person: Person = serde_json::from_value(stored_person()).unwrap();

        assert_eq!(person.id, PersonId(1));
        assert_eq!(person.full_name(), "Ann Lee");
        assert_eq!(person.birthday, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
        assert_eq!(person.nationality, Nationality::British);
        assert_eq!(
            person.citizen_id.as_ref().map(|c| c.to_string()),
            Some("1-2345-67890-12-3".to_string())
        );
        assert_eq!(person.passport_no.as_deref(), Some("AB123"));
        assert_eq!(person.expected_salary, ExpectedSalary(5000.0));
    }

    #[test]
    fn writes_camel_case_fields_and_numeric_salary() {
        let person: Person = serde_json::from_value(stored_person()).unwrap();

        let written = serde_json::to_value(&person).unwrap();

        assert_eq!(written["mobilePhone"], json!("+66812345678"));
        assert_eq!(written["birthday"], json!("1990-05-01"));
        assert!(written["expectedSalary"].is_number());
        assert_eq!(written["expectedSalary"].as_f64(), Some(5000.0));
    }

    #[rstest]
    #[case(json!("5000"), 5000.0)]
    #[case(json!(" 6,000.50 "), 6000.5)]
    #[case(json!(""), 0.0)]
    #[case(json!(null), 0.0)]
    #[case(json!("not a number"), 0.0)]
    #[case(json!(7200), 7200.0)]
    fn stored_salary_is_coerced_to_a_number(
        #[case] stored: serde_json::Value,
        #[case] expected: f64,
    ) {
        let mut value = stored_person();
        value["expectedSalary"] = stored;

        let person: Person = serde_json::from_value(value).unwrap();

        assert_eq!(person.expected_salary.value(), expected);
    }

    #[test]
    fn form_salary_rejects_text() {
        assert_eq!(
            ExpectedSalary::parse("lots"),
            Err(SalaryParseError("lots".to_string()))
        );
        assert_eq!(ExpectedSalary::parse("5000"), Ok(ExpectedSalary(5000.0)));
    }

    #[test]
    fn legacy_citizen_id_string_is_migrated_to_parts() {
        let mut value = stored_person();
        value["citizenId"] = json!("1-2345-67890-12-3");

        let person: Person = serde_json::from_value(value).unwrap();

        assert_eq!(
            person.citizen_id.map(|c| c.parts().map(str::to_string)),
            Some(["1", "2345", "67890", "12", "3"].map(str::to_string))
        );
    }

    #[rstest]
    #[case(json!("12345"))]
    #[case(json!(""))]
    #[case(json!(null))]
    #[case(json!({}))]
    fn unusable_citizen_id_reads_as_none(#[case] stored: serde_json::Value) {
        let mut value = stored_person();
        value["citizenId"] = stored;

        let person: Person = serde_json::from_value(value).unwrap();

        assert_eq!(person.citizen_id, None);
    }

    #[test]
    fn missing_optional_fields_read_as_none() {
        let mut value = stored_person();
        let fields = value.as_object_mut().unwrap();
        fields.remove("citizenId");
        fields.remove("passportNo");

        let person: Person = serde_json::from_value(value).unwrap();

        assert_eq!(person.citizen_id, None);
        assert_eq!(person.passport_no, None);
    }

    #[test]
    fn lowercase_form_values_are_accepted() {
        let mut value = stored_person();
        value["nationality"] = json!("canadian");
        value["gender"] = json!("unisex");

        let person: Person = serde_json::from_value(value).unwrap();

        assert_eq!(person.nationality, Nationality::Canadian);
        assert_eq!(person.gender, Gender::Unisex);
        assert_eq!("AMERICAN".parse::<Nationality>().unwrap(), Nationality::American);
    }

    #[test]
    fn timestamp_birthday_is_cut_to_its_date() {
        let mut value = stored_person();
        value["birthday"] = json!("1990-05-01T10:30:00.000Z");

        let person: Person = serde_json::from_value(value).unwrap();

        assert_eq!(person.birthday, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
    }

    #[rstest]
    #[case("+66812345678", CountryCode::Thailand, "812345678")]
    #[case("+15551234", CountryCode::UnitedStates, "5551234")]
    #[case("+447700900", CountryCode::UnitedKingdom, "7700900")]
    fn mobile_phone_splits_back_into_prefix_and_number(
        #[case] mobile_phone: &str,
        #[case] code: CountryCode,
        #[case] local_number: &str,
    ) {
        assert_eq!(CountryCode::split(mobile_phone), Some((code, local_number)));
        assert_eq!(code.compose(local_number), mobile_phone);
    }

    #[test]
    fn country_code_parses_with_or_without_plus() {
        assert_eq!("+44".parse::<CountryCode>(), Ok(CountryCode::UnitedKingdom));
        assert_eq!("1".parse::<CountryCode>(), Ok(CountryCode::UnitedStates));
        assert!("+999".parse::<CountryCode>().is_err());
    }
}
