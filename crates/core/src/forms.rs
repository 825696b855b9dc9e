//! Request forms and their validation.
//!
//! A form is first deserialized as raw submitted text, then cleaned into a
//! typed draft. Cleaning either yields the draft or a [`FormErrors`] map that
//! the view layer renders next to the preserved input.

use std::collections::BTreeMap;
use std::str::FromStr;

use classifieds_common::naturalsize;
use classifieds_db::entities::{ad, breed, cat, tag};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Largest accepted picture upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Key under which errors not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

const PRICE_MAX_DIGITS: u32 = 7;
const PRICE_DECIMAL_PLACES: u32 = 2;
const TAG_MAX_CHARS: usize = 100;

/// Field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// An empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// A map holding a single non-field error.
    #[must_use]
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(err: ValidationErrors) -> Self {
        let mut errors = Self::new();
        for (field, field_errors) in err.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                errors.add(&field.to_string(), message);
            }
        }
        errors
    }
}

fn validation_errors<T: Validate>(input: &T) -> FormErrors {
    input.validate().map_or_else(FormErrors::from, |()| FormErrors::new())
}

// === Ads ===

/// A picture field resolved at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureUpload {
    /// A file was uploaded with this request.
    Fresh { bytes: Vec<u8>, content_type: String },
    /// No file was uploaded; any stored picture stays as it is.
    Unchanged,
}

impl PictureUpload {
    /// Build from a multipart file part. An empty part with no file name is
    /// what browsers send when no file was chosen.
    #[must_use]
    pub fn from_part(bytes: Vec<u8>, file_name: Option<&str>, content_type: Option<&str>) -> Self {
        if bytes.is_empty() && file_name.is_none_or(str::is_empty) {
            return Self::Unchanged;
        }
        Self::Fresh {
            bytes,
            content_type: content_type
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }
}

/// Label of the picture field, naming the upload limit.
#[must_use]
pub fn picture_label() -> String {
    format!("File to Upload <= {}", naturalsize(MAX_UPLOAD_BYTES as u64))
}

fn picture_too_large() -> String {
    format!("File must be < {}", naturalsize(MAX_UPLOAD_BYTES as u64))
}

/// Ad create/update form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AdForm {
    #[validate(custom(function = "validate_title"))]
    #[serde(default)]
    pub title: String,

    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub price: String,

    /// Comma-separated tag names.
    #[serde(default)]
    pub tags: String,
}

/// A cleaned ad form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdDraft {
    pub title: String,
    pub text: String,
    pub price: Option<Decimal>,
    pub tags: Vec<String>,
    pub picture: PictureUpload,
}

impl AdForm {
    /// Prefill from a stored ad.
    #[must_use]
    pub fn from_model(ad: &ad::Model, tags: &[String]) -> Self {
        Self {
            title: ad.title.clone(),
            text: ad.text.clone(),
            price: ad.price.map(|p| p.to_string()).unwrap_or_default(),
            tags: tags.join(", "),
        }
    }

    /// Validate the submitted values together with the picture upload.
    pub fn clean(&self, picture: PictureUpload) -> Result<AdDraft, FormErrors> {
        let trimmed = Self {
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            price: self.price.trim().to_string(),
            tags: self.tags.clone(),
        };
        let mut errors = validation_errors(&trimmed);

        let price = parse_price(&trimmed.price).unwrap_or_else(|message| {
            errors.add("price", message);
            None
        });

        let tags = parse_tags(&trimmed.tags).unwrap_or_else(|message| {
            errors.add("tags", message);
            Vec::new()
        });

        if let PictureUpload::Fresh { bytes, .. } = &picture {
            if bytes.len() > MAX_UPLOAD_BYTES {
                errors.add("picture", picture_too_large());
            }
        }

        errors.into_result(AdDraft {
            title: trimmed.title,
            text: trimmed.text,
            price,
            tags,
            picture,
        })
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    bounded_length(title, 2, 200, "Title must be greater than 2 characters")
}

fn bounded_length(
    value: &str,
    min: usize,
    max: usize,
    too_short: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new("min_length").with_message(too_short.into()));
    }
    if len > max {
        return Err(ValidationError::new("max_length").with_message(
            format!("Ensure this value has at most {max} characters (it has {len}).").into(),
        ));
    }
    Ok(())
}

/// Parse an optional decimal price, `NUMERIC(7,2)`.
fn parse_price(raw: &str) -> Result<Option<Decimal>, String> {
    if raw.is_empty() {
        return Ok(None);
    }

    let value = Decimal::from_str(raw).map_err(|_| "Enter a number.".to_string())?;
    let value = value.normalize();

    let decimals = value.scale();
    let digits = {
        let mantissa = value.mantissa().unsigned_abs().to_string();
        u32::try_from(mantissa.len()).unwrap_or(u32::MAX).max(decimals)
    };
    let whole_digits = digits - decimals;

    if digits > PRICE_MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {PRICE_MAX_DIGITS} digits in total."
        ));
    }
    if decimals > PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places."
        ));
    }
    if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
        ));
    }

    Ok(Some(value))
}

/// Split comma-separated tag names, dropping blanks and duplicates.
fn parse_tags(raw: &str) -> Result<Vec<String>, String> {
    let mut tags: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        if name.chars().count() > TAG_MAX_CHARS {
            return Err(format!(
                "Ensure each tag has at most {TAG_MAX_CHARS} characters."
            ));
        }
        let slug = tag::slugify(name);
        if !tags.iter().any(|existing| tag::slugify(existing) == slug) {
            tags.push(name.to_string());
        }
    }
    Ok(tags)
}

// === Comments ===

/// Comment form as submitted.
///
/// The detail view advertises these constraints; comment creation stores
/// the submitted text as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "validate_comment"))]
    #[serde(default)]
    pub comment: String,
}

fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    bounded_length(
        comment,
        CommentForm::MIN_LENGTH,
        CommentForm::MAX_LENGTH,
        "Comment must be greater than 3 characters",
    )
}

impl CommentForm {
    /// Length bounds of the `comment` field.
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 500;

    /// Validate the trimmed comment text.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let trimmed = Self {
            comment: self.comment.trim().to_string(),
        };
        validation_errors(&trimmed).into_result(trimmed.comment)
    }
}

// === Accounts ===

/// Login form as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    /// Local path to return to after logging in.
    #[serde(default)]
    pub next: Option<String>,
}

/// Signup form as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 150, message = "Enter a username of 1 to 150 characters."))]
    #[validate(custom(function = "validate_username_chars"))]
    #[serde(default)]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Enter a password of 8 to 128 characters."))]
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl SignupForm {
    /// Validate the form.
    pub fn clean(&self) -> Result<(), FormErrors> {
        validation_errors(self).into_result(())
    }
}

fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ))
    }
}

// === Cats ===

/// Breed form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BreedForm {
    #[validate(length(min = 1, max = 200, message = "Enter a name of 1 to 200 characters."))]
    #[serde(default)]
    pub name: String,
}

impl BreedForm {
    /// Prefill from a stored breed.
    #[must_use]
    pub fn from_model(breed: &breed::Model) -> Self {
        Self {
            name: breed.name.clone(),
        }
    }

    /// Validate the form, yielding the trimmed name.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let trimmed = Self {
            name: self.name.trim().to_string(),
        };
        validation_errors(&trimmed).into_result(trimmed.name)
    }
}

/// Cat form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CatForm {
    #[validate(length(min = 1, max = 200, message = "Enter a nickname of 1 to 200 characters."))]
    #[serde(default)]
    pub nickname: String,

    #[serde(default)]
    pub weight: String,

    #[validate(length(min = 1, max = 300, message = "Enter foods of 1 to 300 characters."))]
    #[serde(default)]
    pub foods: String,

    #[serde(default)]
    pub breed_id: String,
}

/// A cleaned cat form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatDraft {
    pub nickname: String,
    pub weight: i32,
    pub foods: String,
    pub breed_id: String,
}

impl CatForm {
    /// Prefill from a stored cat.
    #[must_use]
    pub fn from_model(cat: &cat::Model) -> Self {
        Self {
            nickname: cat.nickname.clone(),
            weight: cat.weight.to_string(),
            foods: cat.foods.clone(),
            breed_id: cat.breed_id.clone(),
        }
    }

    /// Validate the form against the breeds a cat may belong to.
    pub fn clean(&self, breeds: &[breed::Model]) -> Result<CatDraft, FormErrors> {
        let trimmed = Self {
            nickname: self.nickname.trim().to_string(),
            weight: self.weight.trim().to_string(),
            foods: self.foods.trim().to_string(),
            breed_id: self.breed_id.trim().to_string(),
        };
        let mut errors = validation_errors(&trimmed);

        let weight = match trimmed.weight.parse::<i32>() {
            Ok(weight) if weight >= 0 => weight,
            Ok(_) => {
                errors.add("weight", "Ensure this value is greater than or equal to 0.");
                0
            }
            Err(_) => {
                errors.add("weight", "Enter a whole number.");
                0
            }
        };

        if !breeds.iter().any(|breed| breed.id == trimmed.breed_id) {
            errors.add(
                "breed_id",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }

        errors.into_result(CatDraft {
            nickname: trimmed.nickname,
            weight,
            foods: trimmed.foods,
            breed_id: trimmed.breed_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ad_form(title: &str, price: &str) -> AdForm {
        AdForm {
            title: title.to_string(),
            text: "Ehy".to_string(),
            price: price.to_string(),
            tags: String::new(),
        }
    }

    #[test]
    fn test_short_title_is_a_field_error() {
        let errors = ad_form("a", "").clean(PictureUpload::Unchanged).unwrap_err();

        assert_eq!(
            errors.get("title").unwrap(),
            ["Title must be greater than 2 characters"]
        );
    }

    #[test]
    fn test_valid_ad_form() {
        let draft = ad_form("just a test", "4").clean(PictureUpload::Unchanged).unwrap();

        assert_eq!(draft.title, "just a test");
        assert_eq!(draft.price, Some(Decimal::new(4, 0)));
        assert_eq!(draft.picture, PictureUpload::Unchanged);
    }

    #[test]
    fn test_oversize_picture_names_the_limit() {
        let picture = PictureUpload::Fresh {
            bytes: vec![0; MAX_UPLOAD_BYTES + 1],
            content_type: "image/png".to_string(),
        };

        let errors = ad_form("just a test", "").clean(picture).unwrap_err();

        assert_eq!(errors.get("picture").unwrap(), ["File must be < 2.0 MiB"]);
    }

    #[test]
    fn test_picture_at_the_limit_is_accepted() {
        let picture = PictureUpload::Fresh {
            bytes: vec![0; MAX_UPLOAD_BYTES],
            content_type: "image/png".to_string(),
        };

        assert!(ad_form("just a test", "").clean(picture).is_ok());
    }

    #[test]
    fn test_picture_label() {
        assert_eq!(picture_label(), "File to Upload <= 2.0 MiB");
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(parse_price("").unwrap(), None);
        assert_eq!(parse_price("12.50").unwrap(), Some(Decimal::new(125, 1)));
        assert_eq!(parse_price("99999.99").unwrap(), Some(Decimal::new(9_999_999, 2)));
        assert!(parse_price("abc").is_err());
        assert!(parse_price("1.234").is_err());
        assert!(parse_price("123456").is_err());
        assert!(parse_price("12345678").is_err());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" bikes, vintage ,, bikes").unwrap(),
            vec!["bikes".to_string(), "vintage".to_string()]
        );
        assert!(parse_tags("").unwrap().is_empty());
        assert_eq!(
            parse_tags("Bikes, bikes, Garden Tools, garden-tools").unwrap(),
            vec!["Bikes".to_string(), "Garden Tools".to_string()]
        );
        assert!(parse_tags(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_picture_from_empty_part_is_unchanged() {
        assert_eq!(
            PictureUpload::from_part(Vec::new(), Some(""), Some("application/octet-stream")),
            PictureUpload::Unchanged
        );
        assert_eq!(
            PictureUpload::from_part(vec![1, 2], Some("a.png"), Some("image/png")),
            PictureUpload::Fresh {
                bytes: vec![1, 2],
                content_type: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn test_comment_form_trims_and_checks_length() {
        let form = CommentForm {
            comment: "  ok  ".to_string(),
        };
        assert!(form.clean().unwrap_err().get("comment").is_some());

        let form = CommentForm {
            comment: "  fine  ".to_string(),
        };
        assert_eq!(form.clean().unwrap(), "fine");
    }

    #[test]
    fn test_signup_form_rejects_bad_usernames() {
        let form = SignupForm {
            username: "has space".to_string(),
            password: "long enough".to_string(),
        };
        assert!(form.clean().unwrap_err().get("username").is_some());

        let form = SignupForm {
            username: "alice".to_string(),
            password: "short".to_string(),
        };
        assert!(form.clean().unwrap_err().get("password").is_some());
    }

    #[test]
    fn test_cat_form_checks_weight_and_breed() {
        let breeds = vec![breed::Model {
            id: "breed1".to_string(),
            name: "Siamese".to_string(),
        }];
        let form = CatForm {
            nickname: "Tom".to_string(),
            weight: "-1".to_string(),
            foods: "fish".to_string(),
            breed_id: "nope".to_string(),
        };

        let errors = form.clean(&breeds).unwrap_err();
        assert!(errors.get("weight").is_some());
        assert!(errors.get("breed_id").is_some());

        let form = CatForm {
            weight: "4".to_string(),
            breed_id: "breed1".to_string(),
            ..form
        };
        assert_eq!(form.clean(&breeds).unwrap().weight, 4);
    }

    #[test]
    fn test_non_field_errors() {
        let errors = FormErrors::non_field("Please enter a correct username and password.");
        assert!(errors.get(NON_FIELD_ERRORS).is_some());
    }
}
