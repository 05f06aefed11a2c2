//! Public site content: blog posts, service catalog, inquiries, hero
//! carousel, and the site settings singleton.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,

    pub title: String,

    /// URL slug, unique across posts
    pub slug: String,

    pub content: String,

    pub summary: String,

    pub cover_image: String,

    pub published_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Payload for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub cover_image: String,
}

impl NewPost {
    /// Reject empty required fields before anything is written.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("slug", &self.slug),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", field));
            }
        }
        Ok(())
    }
}

impl Post {
    pub fn create(id: i64, new: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: new.title,
            slug: new.slug,
            content: new.content,
            summary: new.summary,
            cover_image: new.cover_image,
            published_at: now,
            created_at: now,
        }
    }
}

/// A contact-form inquiry from the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: i64,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,

    pub message: String,

    pub created_at: DateTime<Utc>,
}

/// Payload for the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub name: String,

    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    pub message: String,
}

impl NewInquiry {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", field));
            }
        }
        Ok(())
    }
}

impl Inquiry {
    pub fn create(id: i64, new: NewInquiry) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            message: new.message,
            created_at: Utc::now(),
        }
    }
}

/// Icon shown on a service card.
///
/// A closed set: unknown icon names are rejected when the service is
/// written, never silently replaced at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceIcon {
    Car,
    Heart,
    Stethoscope,
    Home,
    Shield,
    Briefcase,
    Umbrella,
    Plane,
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Car => "car",
            Self::Heart => "heart",
            Self::Stethoscope => "stethoscope",
            Self::Home => "home",
            Self::Shield => "shield",
            Self::Briefcase => "briefcase",
            Self::Umbrella => "umbrella",
            Self::Plane => "plane",
        };
        write!(f, "{}", name)
    }
}

/// An entry in the insurance service catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,

    pub title: String,

    pub description: String,

    pub icon: ServiceIcon,
}

/// Payload for creating a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub icon: ServiceIcon,
}

impl Service {
    pub fn create(id: i64, new: NewService) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            icon: new.icon,
        }
    }
}

/// A slide in the home-page hero carousel.
///
/// Slides carry an explicit integer `order` and are reordered by swapping
/// with an adjacent slide. This is deliberately simpler than the pipeline
/// boards: no stage vocabulary, just a manual sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: i64,

    pub title: String,

    pub subtitle: Option<String>,

    /// Image URL or embedded data
    pub image: String,

    pub button_text: String,

    pub button_link: String,

    /// Manual sort key; lists are ascending by this value
    pub order: i32,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

/// Payload for creating a hero slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHeroSlide {
    pub title: String,

    #[serde(default)]
    pub subtitle: Option<String>,

    pub image: String,

    #[serde(default = "default_button_text")]
    pub button_text: String,

    #[serde(default = "default_button_link")]
    pub button_link: String,

    #[serde(default)]
    pub order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_button_text() -> String {
    "Cotação Gratuita".to_string()
}

fn default_button_link() -> String {
    "/contact".to_string()
}

fn default_true() -> bool {
    true
}

/// Partial update for a hero slide; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlidePatch {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub button_text: Option<String>,

    #[serde(default)]
    pub button_link: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl HeroSlide {
    pub fn create(id: i64, new: NewHeroSlide) -> Self {
        Self {
            id,
            title: new.title,
            subtitle: new.subtitle,
            image: new.image,
            button_text: new.button_text,
            button_link: new.button_link,
            order: new.order,
            is_active: new.is_active,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: HeroSlidePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = Some(subtitle);
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(text) = patch.button_text {
            self.button_text = text;
        }
        if let Some(link) = patch.button_link {
            self.button_link = link;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
    }
}

/// Site-wide settings singleton: branding, page copy, contact info.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,

    pub logo: Option<String>,

    pub primary_color: String,

    pub secondary_color: String,

    pub font_sans: String,

    pub font_display: String,

    /// Hero fallbacks used when no carousel slide is active
    pub hero_title: String,

    pub hero_subtitle: String,

    pub about_title: String,

    pub about_content: String,

    pub about_image: Option<String>,

    pub services_title: String,

    pub services_subtitle: String,

    pub blog_title: String,

    pub blog_subtitle: String,

    pub contact_email: String,

    pub contact_phone: String,

    pub address: String,

    pub footer_text: String,

    pub facebook_url: Option<String>,

    pub instagram_url: Option<String>,

    pub twitter_url: Option<String>,

    pub linkedin_url: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Monteiro Corretora".to_string(),
            logo: None,
            primary_color: "#0f172a".to_string(),
            secondary_color: "#fbbf24".to_string(),
            font_sans: "Inter".to_string(),
            font_display: "Outfit".to_string(),
            hero_title: "Protegendo seu Futuro,\nGarantindo seu Legado".to_string(),
            hero_subtitle: "Experimente a tranquilidade de uma cobertura completa. Combinamos expertise tradicional com eficiência moderna.".to_string(),
            about_title: "Sobre a Monteiro Corretora".to_string(),
            about_content: "Fundada por Carlos Monteiro, a Monteiro Corretora começou com uma missão simples: tornar o seguro compreensível, acessível e verdadeiramente protetor para famílias e empresas em São Paulo.".to_string(),
            about_image: None,
            services_title: "Soluções Completas em Seguros".to_string(),
            services_subtitle: "Planos de cobertura personalizados projetados para atender às suas necessidades específicas.".to_string(),
            blog_title: "Blog e Novidades".to_string(),
            blog_subtitle: "Fique por dentro das novidades e dicas do mercado de seguros.".to_string(),
            contact_email: "contato@monteiro.com".to_string(),
            contact_phone: "+55 (11) 9999-9999".to_string(),
            address: "Rua do Comércio, 123, São Paulo, SP".to_string(),
            footer_text: "Oferecemos soluções premium em seguros personalizadas para seu estilo de vida e necessidades de negócios.".to_string(),
            facebook_url: None,
            instagram_url: None,
            twitter_url: None,
            linkedin_url: None,
            updated_at: Utc::now(),
        }
    }
}

/// Partial update for site settings; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettingsPatch {
    pub site_name: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_sans: Option<String>,
    pub font_display: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub about_title: Option<String>,
    pub about_content: Option<String>,
    pub about_image: Option<String>,
    pub services_title: Option<String>,
    pub services_subtitle: Option<String>,
    pub blog_title: Option<String>,
    pub blog_subtitle: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub footer_text: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl SiteSettings {
    /// Merge a partial update and bump `updated_at`.
    pub fn apply(&mut self, patch: SiteSettingsPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }
        merge!(
            site_name,
            primary_color,
            secondary_color,
            font_sans,
            font_display,
            hero_title,
            hero_subtitle,
            about_title,
            about_content,
            services_title,
            services_subtitle,
            blog_title,
            blog_subtitle,
            contact_email,
            contact_phone,
            address,
            footer_text,
        );
        if patch.logo.is_some() {
            self.logo = patch.logo;
        }
        if patch.about_image.is_some() {
            self.about_image = patch.about_image;
        }
        if patch.facebook_url.is_some() {
            self.facebook_url = patch.facebook_url;
        }
        if patch.instagram_url.is_some() {
            self.instagram_url = patch.instagram_url;
        }
        if patch.twitter_url.is_some() {
            self.twitter_url = patch.twitter_url;
        }
        if patch.linkedin_url.is_some() {
            self.linkedin_url = patch.linkedin_url;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_icon_is_closed() {
        let ok: Result<NewService, _> =
            serde_json::from_str(r#"{"title": "Auto", "description": "d", "icon": "car"}"#);
        assert!(ok.is_ok());

        let bad: Result<NewService, _> =
            serde_json::from_str(r#"{"title": "Auto", "description": "d", "icon": "Rocket"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_inquiry_validation() {
        let inquiry = NewInquiry {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            message: "  ".to_string(),
        };
        let err = inquiry.validate().unwrap_err();
        assert!(err.contains("message"));

        let ok = NewInquiry {
            message: "Quero uma cotação".to_string(),
            ..inquiry
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_hero_slide_defaults() {
        let new: NewHeroSlide =
            serde_json::from_str(r#"{"title": "Bem-vindo", "image": "hero.jpg"}"#).unwrap();
        let slide = HeroSlide::create(1, new);

        assert_eq!(slide.button_text, "Cotação Gratuita");
        assert_eq!(slide.button_link, "/contact");
        assert_eq!(slide.order, 0);
        assert!(slide.is_active);
    }

    #[test]
    fn test_hero_slide_patch_leaves_absent_fields() {
        let new: NewHeroSlide =
            serde_json::from_str(r#"{"title": "Bem-vindo", "image": "hero.jpg"}"#).unwrap();
        let mut slide = HeroSlide::create(1, new);

        slide.apply(HeroSlidePatch {
            title: Some("Novo título".to_string()),
            is_active: Some(false),
            ..Default::default()
        });

        assert_eq!(slide.title, "Novo título");
        assert!(!slide.is_active);
        assert_eq!(slide.image, "hero.jpg");
    }

    #[test]
    fn test_settings_patch_bumps_updated_at() {
        let mut settings = SiteSettings::default();
        let before = settings.updated_at;

        settings.apply(SiteSettingsPatch {
            site_name: Some("Corretora Nova".to_string()),
            ..Default::default()
        });

        assert_eq!(settings.site_name, "Corretora Nova");
        assert_eq!(settings.primary_color, "#0f172a");
        assert!(settings.updated_at >= before);
    }
}
