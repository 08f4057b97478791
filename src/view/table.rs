use database::{database::table::query::Page, model::person::Person};
use num_format::{Locale as NumberLocale, ToFormattedString};

use crate::i18n::i18n::{translate, translate_with, Key, Locale};

pub const DEFAULT_PAGE_SIZE: usize = 10;

const COLUMN_GAP: &str = "  ";

/// Renders one page of the person table followed by the item total
pub fn render_page(locale: Locale, page: &Page) -> String {
    let header: Vec<String> = [
        Key::Manage,
        Key::Name,
        Key::Gender,
        Key::MobilePhone,
        Key::Nationality,
        Key::ExpectedSalary,
    ]
    .iter()
    .map(|key| translate(locale, *key).to_string())
    .collect();

    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|person| {
            vec![
                format!("#{}", person.id),
                person.full_name(),
                translate(locale, Key::for_gender(person.gender)).to_string(),
                person.mobile_phone.clone(),
                person.nationality.to_string(),
                format_salary(person),
            ]
        })
        .collect();

    let mut output = String::new();

    output.push_str(translate(locale, Key::FormAndTable));
    output.push('\n');
    output.push_str(&render_grid(&header, &rows));
    output.push_str(&format!(
        "{}  ({}/{})\n",
        translate_with(locale, Key::TotalItems, &[("total", page.total.to_string())]),
        page.page,
        page.page_count
    ));

    output
}

/// Every field of one record, labelled, the way the form shows it while editing
pub fn render_person(locale: Locale, person: &Person) -> String {
    let fields = [
        (Key::Manage, format!("#{}", person.id)),
        (Key::Title, person.title.clone()),
        (Key::Firstname, person.firstname.clone()),
        (Key::Lastname, person.lastname.clone()),
        (Key::Birthday, person.birthday.format("%Y-%m-%d").to_string()),
        (Key::Nationality, person.nationality.to_string()),
        (
            Key::CitizenId,
            person
                .citizen_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        (
            Key::Gender,
            translate(locale, Key::for_gender(person.gender)).to_string(),
        ),
        (Key::MobilePhone, person.mobile_phone.clone()),
        (Key::PassportNo, person.passport_no.clone().unwrap_or_default()),
        (Key::ExpectedSalary, format_salary(person)),
    ];

    let labels: Vec<&str> = fields.iter().map(|(key, _)| translate(locale, *key)).collect();
    let label_width = labels.iter().map(|label| width(label)).max().unwrap_or(0);

    fields
        .iter()
        .zip(labels)
        .map(|((_, value), label)| format!("{}{}{}\n", pad(label, label_width), COLUMN_GAP, value))
        .collect()
}

fn format_salary(person: &Person) -> String {
    let salary = person.expected_salary.value();

    if salary.fract() == 0.0 && salary.abs() < i64::MAX as f64 {
        (salary as i64).to_formatted_string(&NumberLocale::en)
    } else {
        format!("{:.2}", salary)
    }
}

fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..header.len())
        .map(|column| {
            rows.iter()
                .map(|row| width(&row[column]))
                .chain(std::iter::once(width(&header[column])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_line = |cells: &[String]| -> String {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, column_width)| pad(cell, *column_width))
            .collect();

        format!("{}\n", line.join(COLUMN_GAP).trim_end())
    };

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut output = render_line(header);
    output.push_str(&render_line(&separator[..]));

    for row in rows {
        output.push_str(&render_line(&row[..]));
    }

    output
}

// Counted in chars, close enough for the scripts the table shows
fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, column_width: usize) -> String {
    format!("{}{}", text, " ".repeat(column_width.saturating_sub(width(text))))
}

#[cfg(test)]
mod tests {
    use database::{
        database::table::query::{paginate, PageRequest},
        model::person::ExpectedSalary,
    };

    use super::*;

    fn people() -> Vec<Person> {
        let mut ann = Person::new_test(1, "Ann");
        ann.expected_salary = ExpectedSalary(1_250_000.0);

        let mut bob = Person::new_test(2, "Bob");
        bob.expected_salary = ExpectedSalary(5000.5);

        vec![ann, bob]
    }

    #[test]
    fn page_lists_rows_and_total() {
        let people = people();
        let page = paginate(people.iter().collect(), PageRequest::default());

        let output = render_page(Locale::En, &page);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Form & Table");
        assert!(lines[1].starts_with("MANAGE  Name"));
        assert!(lines[3].starts_with("#1"));
        assert!(lines[3].contains("Ann Tester"));
        assert!(lines[3].contains("1,250,000"));
        assert!(lines[4].contains("5000.50"));
        assert_eq!(lines[5], "Total 2 items  (1/1)");
    }

    #[test]
    fn thai_labels_and_gender() {
        let people = people();
        let page = paginate(people.iter().collect(), PageRequest::default());

        let output = render_page(Locale::Th, &page);

        assert!(output.contains("จัดการ"));
        assert!(output.contains("หญิง"));
        assert!(output.contains("ทั้งหมด 2 รายการ"));
    }

    #[test]
    fn person_details_are_labelled() {
        let people = people();

        let output = render_person(Locale::En, &people[0]);

        assert!(output.contains("Firstname"));
        assert!(output.lines().any(|line| line.starts_with("Birthday") && line.ends_with("1990-01-01")));
        assert!(output.lines().any(|line| line.starts_with("Mobile Phone") && line.ends_with("+66812345678")));
    }
}
