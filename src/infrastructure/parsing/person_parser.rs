//! Person detail page parser
//!
//! Extracts the person field set, including the multi-branch date handling:
//! birth and death dates carry a trailing parenthetical age, and the age
//! scalar is taken from the death date when one exists, otherwise from the
//! birth date.

use super::config::{PersonFactLabels, PersonSelectors};
use super::{
    compile_selector, labeled_fact, select_attr, select_text, PageParser, ParsingError,
    ParsingResult,
};
use crate::domain::fixture::PersonFields;
use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Parser for person detail pages.
pub struct PersonParser {
    name: Selector,
    photo: Selector,
    biography: Selector,
    facts_row: Selector,
    fact_label: Selector,
    labels: PersonFactLabels,
    /// Matches a date value ending in a parenthetical integer, with or
    /// without trailing words, e.g. `"(63)"` or `"(63 años)"`.
    date_with_age: Regex,
}

impl PersonParser {
    /// Create a parser with the default selector rules.
    pub fn new() -> Result<Self> {
        Self::with_config(&PersonSelectors::default())
    }

    /// Create a parser with custom selector rules.
    pub fn with_config(selectors: &PersonSelectors) -> Result<Self> {
        Ok(Self {
            name: compile_selector(&selectors.name)?,
            photo: compile_selector(&selectors.photo)?,
            biography: compile_selector(&selectors.biography)?,
            facts_row: compile_selector(&selectors.facts_row)?,
            fact_label: compile_selector(&selectors.fact_label)?,
            labels: selectors.labels.clone(),
            date_with_age: Regex::new(r"^(?P<date>.*?)\s*\((?P<age>\d+)[^)]*\)$")?,
        })
    }

    /// Split a date value into its bare date and parenthetical age.
    fn split_date_age(&self, value: &str, context: &str) -> ParsingResult<(String, Option<u32>)> {
        match self.date_with_age.captures(value.trim()) {
            Some(caps) => {
                let date = caps["date"].trim().to_string();
                let age = caps["age"]
                    .parse::<u32>()
                    .map_err(|_| ParsingError::MalformedValue {
                        field: "age".to_string(),
                        value: value.to_string(),
                        context: context.to_string(),
                    })?;
                Ok((date, Some(age)))
            }
            None => Ok((value.trim().to_string(), None)),
        }
    }

    fn map_gender(&self, label: &str, context: &str) -> ParsingResult<String> {
        match label {
            "Masculino" => Ok("M".to_string()),
            "Femenino" => Ok("F".to_string()),
            other => Err(ParsingError::UnknownGender {
                label: other.to_string(),
                context: context.to_string(),
            }),
        }
    }

    fn fact(&self, root: scraper::ElementRef<'_>, label: &str) -> Option<String> {
        labeled_fact(root, &self.facts_row, &self.fact_label, label)
    }
}

impl PageParser for PersonParser {
    type Output = PersonFields;

    fn parse(&self, html: &Html, context: &str) -> ParsingResult<PersonFields> {
        let root = html.root_element();

        let name = select_text(root, &self.name)
            .ok_or_else(|| ParsingError::required_field_missing("name", context))?;

        let photo = select_attr(root, &self.photo, "src");
        let biography = select_text(root, &self.biography);

        let gender = match self.fact(root, &self.labels.gender) {
            Some(label) => Some(self.map_gender(&label, context)?),
            None => None,
        };
        let principal_role = self.fact(root, &self.labels.known_for);
        let birth_place = self.fact(root, &self.labels.birth_place);

        let (death_date, death_age) = match self.fact(root, &self.labels.death_date) {
            Some(value) => {
                let (date, age) = self.split_date_age(&value, context)?;
                (Some(date), age)
            }
            None => (None, None),
        };
        let (birth_date, birth_age) = match self.fact(root, &self.labels.birth_date) {
            Some(value) => {
                let (date, age) = self.split_date_age(&value, context)?;
                (Some(date), age)
            }
            None => (None, None),
        };
        // Age belongs to the death date when the person is deceased; the
        // birth parenthetical is discarded in that case.
        let age = if death_date.is_some() {
            death_age
        } else {
            birth_age
        };

        debug!(person = %name, %context, "extracted person fields");

        Ok(PersonFields {
            name,
            photo,
            gender,
            principal_role,
            birth_date,
            death_date,
            age,
            birth_place,
            biography,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parser() -> PersonParser {
        PersonParser::new().unwrap()
    }

    fn person_html(facts: &str) -> Html {
        Html::parse_document(&format!(
            r#"
            <div class="content_wrapper">
              <div class="grey_column">
                <div class="image_content"><img src="https://img.example/p/42.jpg"></div>
                <section class="full_wrapper facts left_column">{facts}</section>
              </div>
              <div class="title"><a href="/person/42-jane-doe">Jane Doe</a></div>
              <div class="text initial">A short biography.</div>
            </div>
            "#
        ))
    }

    #[test]
    fn extracts_full_person_record() {
        let html = person_html(
            r#"
            <p><strong><bdi>Sexo</bdi></strong> Femenino</p>
            <p><strong><bdi>Conocido por</bdi></strong> Interpretación</p>
            <p><strong><bdi>Fecha de nacimiento</bdi></strong> 12 de enero de 1957 (68)</p>
            <p><strong><bdi>Lugar de nacimiento</bdi></strong> Madrid, España</p>
            "#,
        );
        let person = parser().parse(&html, "person/42").unwrap();
        assert_eq!(person.name, "Jane Doe");
        assert_eq!(person.photo.as_deref(), Some("https://img.example/p/42.jpg"));
        assert_eq!(person.gender.as_deref(), Some("F"));
        assert_eq!(person.principal_role.as_deref(), Some("Interpretación"));
        assert_eq!(person.birth_date.as_deref(), Some("12 de enero de 1957"));
        assert_eq!(person.death_date, None);
        assert_eq!(person.age, Some(68));
        assert_eq!(person.birth_place.as_deref(), Some("Madrid, España"));
        assert_eq!(person.biography.as_deref(), Some("A short biography."));
    }

    #[test]
    fn age_comes_from_death_date_when_deceased() {
        let html = person_html(
            r#"
            <p><strong><bdi>Fecha de defunción</bdi></strong> 15 de marzo de 2020 (63)</p>
            <p><strong><bdi>Fecha de nacimiento</bdi></strong> 12 de enero de 1957 (63)</p>
            "#,
        );
        let person = parser().parse(&html, "person/42").unwrap();
        assert_eq!(person.death_date.as_deref(), Some("15 de marzo de 2020"));
        assert_eq!(person.birth_date.as_deref(), Some("12 de enero de 1957"));
        assert_eq!(person.age, Some(63));
    }

    #[test]
    fn death_without_parenthetical_leaves_age_unset() {
        let html = person_html(
            r#"
            <p><strong><bdi>Fecha de defunción</bdi></strong> 15 de marzo de 2020</p>
            <p><strong><bdi>Fecha de nacimiento</bdi></strong> 12 de enero de 1957 (63)</p>
            "#,
        );
        let person = parser().parse(&html, "person/42").unwrap();
        assert_eq!(person.death_date.as_deref(), Some("15 de marzo de 2020"));
        assert_eq!(person.age, None);
    }

    #[rstest]
    #[case("12 de enero de 1957 (63)", "12 de enero de 1957", Some(63))]
    #[case("15/03/2020 (63 años)", "15/03/2020", Some(63))]
    #[case("12 de enero de 1957", "12 de enero de 1957", None)]
    fn date_with_age_variants(
        #[case] input: &str,
        #[case] date: &str,
        #[case] age: Option<u32>,
    ) {
        let (got_date, got_age) = parser().split_date_age(input, "test").unwrap();
        assert_eq!(got_date, date);
        assert_eq!(got_age, age);
    }

    #[test]
    fn dash_fact_value_reads_as_absent() {
        let html = person_html(r#"<p><strong><bdi>Lugar de nacimiento</bdi></strong> -</p>"#);
        let person = parser().parse(&html, "person/42").unwrap();
        assert_eq!(person.birth_place, None);
    }

    #[test]
    fn unknown_gender_label_is_fatal() {
        let html = person_html(r#"<p><strong><bdi>Sexo</bdi></strong> Desconocido</p>"#);
        let err = parser().parse(&html, "person/42").unwrap_err();
        assert!(matches!(err, ParsingError::UnknownGender { label, .. } if label == "Desconocido"));
    }

    #[test]
    fn missing_name_is_fatal() {
        let html = Html::parse_document("<div class=\"content_wrapper\"></div>");
        let err = parser().parse(&html, "person/42").unwrap_err();
        assert!(matches!(err, ParsingError::RequiredFieldMissing { field, .. } if field == "name"));
    }
}
