//! Integration tests for the reorganization orchestrator.
//!
//! Tests cover:
//! - The end-to-end move/update/rewrite/reclaim pipeline
//! - Idempotence across repeated runs
//! - Outcome accounting and failure isolation
//! - Preview against speculative post state

use chrono::TimeZone;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use uploads_organizer::core::orchestrator::{
    should_reorganize_on_save, PreviewStatus, Reorganizer,
};
use uploads_organizer::models::attachment::{AttachmentMeta, MediaAttachment, SizeVariant};
use uploads_organizer::models::post::{OwningPost, PostStatus, Term};
use uploads_organizer::models::result::MoveOutcome;
use uploads_organizer::models::settings::{PostIdentifier, Settings};
use uploads_organizer::store::{
    ContentStore, Library, MetaRecord, MetaValue, UpdateOrigin, UploadsLayout,
};

const BASE_URL: &str = "https://example.com/uploads";

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
}

fn full_settings() -> Settings {
    Settings {
        use_post_type: true,
        taxonomy_name: "category".to_string(),
        post_identifier: PostIdentifier::Slug,
        ..Settings::default()
    }
}

/// A post with one attached image (plus thumbnail) in the date layout,
/// referenced from the post body and from a gallery meta record.
fn fixture(root: &Path) -> Library {
    write(root, "2024/03/photo.jpg", b"primary bytes");
    write(root, "2024/03/photo-150x150.jpg", b"thumb bytes");

    let mut sizes = BTreeMap::new();
    sizes.insert(
        "thumbnail".to_string(),
        SizeVariant {
            file: "photo-150x150.jpg".to_string(),
            width: 150,
            height: 150,
        },
    );

    Library {
        version: "1.0".to_string(),
        layout: UploadsLayout {
            root: root.to_path_buf(),
            base_url: BASE_URL.to_string(),
            date_folders: true,
        },
        settings: BTreeMap::new(),
        posts: vec![OwningPost {
            id: 1,
            post_type: "post".to_string(),
            status: PostStatus::Publish,
            slug: "launch-day".to_string(),
            title: "Launch Day".to_string(),
            date: chrono::Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
            content: format!("<img src=\"{}/2024/03/photo.jpg\">", BASE_URL),
            terms: [(
                "category".to_string(),
                vec![Term {
                    id: 9,
                    name: "News".to_string(),
                    slug: "news".to_string(),
                }],
            )]
            .into_iter()
            .collect(),
            featured_image: None,
        }],
        attachments: vec![MediaAttachment {
            id: 7,
            parent: Some(1),
            file: "2024/03/photo.jpg".to_string(),
            meta: AttachmentMeta {
                sizes,
                original_image: None,
            },
        }],
        meta: vec![MetaRecord {
            owner: 1,
            key: "gallery".to_string(),
            value: MetaValue::List(vec![MetaValue::Str(format!(
                "{}/2024/03/photo.jpg",
                BASE_URL
            ))]),
        }],
    }
}

const TARGET: &str = "post/category/news/2024/03/launch-day/photo.jpg";

// ========== END-TO-END PIPELINE ==========

#[test]
fn test_full_pipeline_moves_and_rewrites_everything() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut library = fixture(root);

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let summary = reorganizer.reorganize(&[1]);

    assert_eq!(summary.moved(), 1);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.total(), 1);

    // Files moved, nothing lost.
    assert_eq!(std::fs::read(root.join(TARGET)).unwrap(), b"primary bytes");
    assert!(root
        .join("post/category/news/2024/03/launch-day/photo-150x150.jpg")
        .is_file());
    assert!(!root.join("2024/03/photo.jpg").exists());

    // Vacated date directories reclaimed, uploads root intact.
    assert!(!root.join("2024").exists());
    assert!(root.exists());

    // Metadata points at the new location.
    assert_eq!(library.attachment(7).unwrap().file, TARGET);

    // Body and meta references rewritten.
    let post = library.post(1).unwrap();
    assert!(post.content.contains(&format!("{}/{}", BASE_URL, TARGET)));
    assert!(!post.content.contains("2024/03/photo.jpg\""));
    assert!(library.meta_records()[0]
        .value
        .contains_str(&format!("{}/{}", BASE_URL, TARGET)));
}

#[test]
fn test_second_run_is_fully_already_organized() {
    let temp_dir = TempDir::new().unwrap();
    let mut library = fixture(temp_dir.path());

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout.clone());
    let first = reorganizer.reorganize(&[1]);
    assert_eq!(first.moved(), 1);

    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let second = reorganizer.reorganize(&[1]);

    assert_eq!(second.moved(), 0);
    assert_eq!(second.already_organized(), second.total());
    assert_eq!(
        std::fs::read(temp_dir.path().join(TARGET)).unwrap(),
        b"primary bytes"
    );
}

#[test]
fn test_already_organized_post_is_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut library = fixture(root);

    // Place everything at the target up front.
    library.attachments[0].file = TARGET.to_string();
    std::fs::remove_file(root.join("2024/03/photo.jpg")).unwrap();
    std::fs::remove_file(root.join("2024/03/photo-150x150.jpg")).unwrap();
    write(root, TARGET, b"primary bytes");
    write(
        root,
        "post/category/news/2024/03/launch-day/photo-150x150.jpg",
        b"thumb bytes",
    );

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let summary = reorganizer.reorganize(&[1]);

    assert_eq!(summary.already_organized(), 1);
    assert_eq!(summary.moved(), 0);
    assert_eq!(std::fs::read(root.join(TARGET)).unwrap(), b"primary bytes");
}

// ========== FAILURE ISOLATION ==========

#[test]
fn test_destination_conflict_marks_failed_and_preserves_both_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut library = fixture(root);
    write(root, TARGET, b"squatter");

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let summary = reorganizer.reorganize(&[1]);

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.moved(), 0);
    assert_eq!(
        std::fs::read(root.join("2024/03/photo.jpg")).unwrap(),
        b"primary bytes"
    );
    assert_eq!(std::fs::read(root.join(TARGET)).unwrap(), b"squatter");

    // Metadata still points at the old location.
    assert_eq!(library.attachment(7).unwrap().file, "2024/03/photo.jpg");
}

#[test]
fn test_unresolvable_post_yields_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let mut library = fixture(temp_dir.path());
    library.posts[0].slug = String::new();
    library.posts[0].title = String::new();

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let summary = reorganizer.reorganize(&[1]);

    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.total(), 1);
    // Nothing moved.
    assert!(temp_dir.path().join("2024/03/photo.jpg").exists());
}

#[test]
fn test_missing_post_fails_that_post_only() {
    let temp_dir = TempDir::new().unwrap();
    let mut library = fixture(temp_dir.path());

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let summary = reorganizer.reorganize(&[999, 1]);

    assert!(summary.posts[0].error.is_some());
    assert_eq!(summary.posts[1].results[0].outcome, MoveOutcome::Moved);
}

// ========== MEDIA ENUMERATION ==========

#[test]
fn test_featured_and_in_body_media_are_included() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut library = fixture(root);

    // A featured image and a body-referenced image, neither attached.
    write(root, "2024/03/hero.jpg", b"hero");
    write(root, "2024/03/inline-300x200.jpg", b"inline variant");
    write(root, "2024/03/inline.jpg", b"inline");
    library.attachments.push(MediaAttachment {
        id: 8,
        parent: None,
        file: "2024/03/hero.jpg".to_string(),
        meta: AttachmentMeta::default(),
    });
    library.attachments.push(MediaAttachment {
        id: 9,
        parent: None,
        file: "2024/03/inline.jpg".to_string(),
        meta: AttachmentMeta {
            sizes: [(
                "medium".to_string(),
                SizeVariant {
                    file: "inline-300x200.jpg".to_string(),
                    width: 300,
                    height: 200,
                },
            )]
            .into_iter()
            .collect(),
            original_image: None,
        },
    });
    library.posts[0].featured_image = Some(8);
    // Body references the size variant; it must resolve to attachment 9.
    library.posts[0].content = format!(
        "<img src=\"{}/2024/03/photo.jpg\"> <img src=\"{}/2024/03/inline-300x200.jpg\">",
        BASE_URL, BASE_URL
    );

    let layout = library.layout.clone();
    let mut reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let summary = reorganizer.reorganize(&[1]);

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.moved(), 3);
    assert!(root
        .join("post/category/news/2024/03/launch-day/hero.jpg")
        .is_file());
    assert!(root
        .join("post/category/news/2024/03/launch-day/inline.jpg")
        .is_file());
    assert!(root
        .join("post/category/news/2024/03/launch-day/inline-300x200.jpg")
        .is_file());
}

// ========== PREVIEW ==========

#[test]
fn test_preview_reports_without_mutating() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut library = fixture(root);

    let layout = library.layout.clone();
    let reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let items = reorganizer.preview(1, None, None).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, PreviewStatus::WillMove);
    assert_eq!(items[0].target_path, TARGET);

    // No mutation: file and metadata untouched.
    assert!(root.join("2024/03/photo.jpg").exists());
    assert_eq!(library.attachment(7).unwrap().file, "2024/03/photo.jpg");
}

#[test]
fn test_preview_with_speculative_slug_and_term() {
    let temp_dir = TempDir::new().unwrap();
    let mut library = fixture(temp_dir.path());

    let layout = library.layout.clone();
    let reorganizer = Reorganizer::new(&mut library, full_settings(), layout);
    let items = reorganizer
        .preview(1, Some("renamed-post"), Some("events"))
        .unwrap();

    assert_eq!(
        items[0].target_path,
        "post/category/events/2024/03/renamed-post/photo.jpg"
    );
}

// ========== SAVE GUARD ==========

#[test]
fn test_save_guard_rejects_reorganizer_and_non_published() {
    let temp_dir = TempDir::new().unwrap();
    let library = fixture(temp_dir.path());
    let post = library.post(1).unwrap();

    assert!(should_reorganize_on_save(&post, UpdateOrigin::Editor));
    assert!(!should_reorganize_on_save(&post, UpdateOrigin::Reorganizer));

    let mut draft = post.clone();
    draft.status = PostStatus::Draft;
    assert!(!should_reorganize_on_save(&draft, UpdateOrigin::Editor));

    let mut revision = post;
    revision.post_type = "revision".to_string();
    assert!(!should_reorganize_on_save(&revision, UpdateOrigin::Editor));
}
