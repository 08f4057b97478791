use thiserror::Error;

use crate::consts::consts::PersonId;

use super::{
    citizen_id::{CitizenId, CitizenIdError},
    person::{
        parse_birthday, CountryCode, ExpectedSalary, Gender, Nationality, Person,
        SalaryParseError, UnknownCountryCode,
    },
    statement::Statement,
};

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Required field is missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error(transparent)]
    CitizenId(#[from] CitizenIdError),

    #[error(transparent)]
    Salary(#[from] SalaryParseError),

    #[error(transparent)]
    CountryCode(#[from] UnknownCountryCode),
}

/// Raw form input for a person, everything as the user typed it. `None` means the
/// field was left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonForm {
    pub title: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub birthday: Option<String>,
    pub nationality: Option<String>,
    pub citizen_id: Option<String>,
    pub gender: Option<String>,
    pub country_code: Option<String>,
    pub mobile_phone: Option<String>,
    pub passport_no: Option<String>,
    pub expected_salary: Option<String>,
    /// Stored number without a known country prefix, saved back as it is unless the
    /// country code or mobile phone is changed
    pub unprefixed_mobile_phone: Option<String>,
}

impl PersonForm {
    /// Fills the form from an existing record, the starting point for an edit
    pub fn from_person(person: &Person) -> Self {
        let (country_code, local_number, unprefixed_mobile_phone) =
            match CountryCode::split(&person.mobile_phone) {
                Some((code, local_number)) => {
                    (Some(code.to_string()), local_number.to_string(), None)
                }
                None => (None, person.mobile_phone.clone(), Some(person.mobile_phone.clone())),
            };

        PersonForm {
            title: Some(person.title.clone()),
            firstname: Some(person.firstname.clone()),
            lastname: Some(person.lastname.clone()),
            birthday: Some(person.birthday.format("%Y-%m-%d").to_string()),
            nationality: Some(person.nationality.to_string()),
            citizen_id: person.citizen_id.as_ref().map(CitizenId::to_string),
            gender: Some(person.gender.to_string()),
            country_code,
            mobile_phone: Some(local_number),
            passport_no: person.passport_no.clone(),
            expected_salary: Some(person.expected_salary.value().to_string()),
            unprefixed_mobile_phone,
        }
    }

    /// Overwrites every field that `changes` touched
    pub fn apply_changes(&mut self, changes: PersonForm) {
        fn take(field: &mut Option<String>, change: Option<String>) {
            if change.is_some() {
                *field = change;
            }
        }

        if changes.country_code.is_some() || changes.mobile_phone.is_some() {
            self.unprefixed_mobile_phone = None;
        }

        take(&mut self.title, changes.title);
        take(&mut self.firstname, changes.firstname);
        take(&mut self.lastname, changes.lastname);
        take(&mut self.birthday, changes.birthday);
        take(&mut self.nationality, changes.nationality);
        take(&mut self.citizen_id, changes.citizen_id);
        take(&mut self.gender, changes.gender);
        take(&mut self.country_code, changes.country_code);
        take(&mut self.mobile_phone, changes.mobile_phone);
        take(&mut self.passport_no, changes.passport_no);
        take(&mut self.expected_salary, changes.expected_salary);
    }

    /// Checks required fields and builds the record under the given id
    pub fn into_person(self, id: PersonId) -> Result<Person, FormError> {
        let birthday_text = required(self.birthday, "birthday")?;
        let birthday = parse_birthday(&birthday_text).map_err(|_| FormError::InvalidValue {
            field: "birthday",
            value: birthday_text.clone(),
        })?;

        let nationality_text = required(self.nationality, "nationality")?;
        let nationality: Nationality =
            nationality_text
                .parse()
                .map_err(|_| FormError::InvalidValue {
                    field: "nationality",
                    value: nationality_text.clone(),
                })?;

        let gender_text = required(self.gender, "gender")?;
        let gender: Gender = gender_text.parse().map_err(|_| FormError::InvalidValue {
            field: "gender",
            value: gender_text.clone(),
        })?;

        let citizen_id = match optional(self.citizen_id) {
            Some(text) => Some(text.parse::<CitizenId>()?),
            None => None,
        };

        let country_code = match optional(self.country_code) {
            Some(text) => text.parse::<CountryCode>()?,
            None => CountryCode::default(),
        };

        let local_number = required(self.mobile_phone, "mobilePhone")?;
        let mobile_phone = match self.unprefixed_mobile_phone {
            Some(stored) => stored,
            None => country_code.compose(&local_number),
        };
        let expected_salary =
            ExpectedSalary::parse(&required(self.expected_salary, "expectedSalary")?)?;

        Ok(Person {
            id,
            title: required(self.title, "title")?,
            firstname: required(self.firstname, "firstname")?,
            lastname: required(self.lastname, "lastname")?,
            birthday,
            nationality,
            citizen_id,
            gender,
            mobile_phone,
            passport_no: optional(self.passport_no),
            expected_salary,
        })
    }

    /// Submitting with an edit target replaces that record, otherwise a new record
    /// is created under a fresh id
    pub fn submit(self, edit_target: Option<PersonId>) -> Result<Statement, FormError> {
        match edit_target {
            Some(id) => Ok(Statement::Update(self.into_person(id)?)),
            None => Ok(Statement::Add(self.into_person(PersonId::new())?)),
        }
    }
}

fn optional(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(field: Option<String>, name: &'static str) -> Result<String, FormError> {
    optional(field).ok_or(FormError::MissingField(name))
}
