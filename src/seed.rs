//! First-run seed data: default service catalog, starter posts, and the
//! initial admin account. Idempotent: existing data is never touched.

use anyhow::{Context, Result};
use tracing::info;

use crate::auth;
use crate::domain::{NewPost, NewService, Role, ServiceIcon};
use crate::store::ResourceStore;

/// Populate empty collections with their defaults.
pub async fn seed_if_empty(store: &dyn ResourceStore) -> Result<()> {
    if store.list_services().await?.is_empty() {
        let defaults = [
            NewService {
                title: "Seguro Auto".to_string(),
                description:
                    "Proteção completa para seu veículo contra roubo, colisão e terceiros."
                        .to_string(),
                icon: ServiceIcon::Car,
            },
            NewService {
                title: "Seguro de Vida".to_string(),
                description:
                    "Garanta a segurança financeira da sua família em momentos difíceis."
                        .to_string(),
                icon: ServiceIcon::Heart,
            },
            NewService {
                title: "Plano de Saúde".to_string(),
                description: "As melhores opções de planos de saúde para você e sua família."
                    .to_string(),
                icon: ServiceIcon::Stethoscope,
            },
            NewService {
                title: "Seguro Residencial".to_string(),
                description: "Proteja seu lar contra incêndios, roubos e danos elétricos."
                    .to_string(),
                icon: ServiceIcon::Home,
            },
        ];

        for service in defaults {
            store.create_service(service).await?;
        }
        info!("seeded default service catalog");
    }

    if store.list_posts().await?.is_empty() {
        store
            .create_post(NewPost {
                title: "Por que contratar um seguro auto?".to_string(),
                slug: "por-que-contratar-seguro-auto".to_string(),
                summary:
                    "Descubra a importância de ter seu veículo protegido e evite dores de cabeça."
                        .to_string(),
                content:
                    "Ter um seguro auto é essencial para quem busca tranquilidade no trânsito..."
                        .to_string(),
                cover_image: "/images/blog/seguro-auto.jpg".to_string(),
            })
            .await?;
        store
            .create_post(NewPost {
                title: "Dicas para economizar no seguro".to_string(),
                slug: "dicas-economizar-seguro".to_string(),
                summary:
                    "Saiba como reduzir o valor do seu seguro sem perder coberturas importantes."
                        .to_string(),
                content:
                    "Muitas pessoas não sabem, mas pequenas atitudes podem diminuir o valor do seguro..."
                        .to_string(),
                cover_image: "/images/blog/economizar.jpg".to_string(),
            })
            .await?;
        info!("seeded starter posts");
    }

    if store.find_user_by_username("admin").await?.is_none() {
        store
            .create_user(auth::new_user("admin", "admin123", "Admin User", Role::Admin))
            .await
            .context("Failed to seed admin user")?;
        info!("seeded admin user");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = JsonStore::in_memory();

        seed_if_empty(&store).await.unwrap();
        let services = store.list_services().await.unwrap();
        let posts = store.list_posts().await.unwrap();
        assert_eq!(services.len(), 4);
        assert_eq!(posts.len(), 2);

        seed_if_empty(&store).await.unwrap();
        assert_eq!(store.list_services().await.unwrap().len(), 4);
        assert_eq!(store.list_posts().await.unwrap().len(), 2);

        let admin = store.find_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.role.is_admin());
    }
}
