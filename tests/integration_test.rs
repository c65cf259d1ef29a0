use macloc::prelude::*;
use macloc::dictionary::{NibSpec, SourceSpec, SystemDictionary};
use macloc::session::ExportSession;

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

const STRINGS_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>Quit %@</key>
	<string>{quit}</string>
	<key>Save</key>
	<string>{save}</string>
</dict>
</plist>
"#;

fn write_strings_table(bundle: &Path, locale: &str, name: &str, quit: &str, save: &str) {
    let lproj = bundle.join("Resources").join(format!("{locale}.lproj"));
    fs::create_dir_all(&lproj).unwrap();
    let content = STRINGS_TEMPLATE
        .replace("{quit}", quit)
        .replace("{save}", save);
    fs::write(lproj.join(name), content).unwrap();
}

fn write_helper_bundle(bundle: &Path) {
    // Table keyed by archive-internal identifiers; the NIB recovers the
    // true source text.
    let table = r#"<plist><dict><key>77.title</key><string>Plus grand</string></dict></plist>"#;
    let lproj = bundle.join("Resources/fr.lproj");
    fs::create_dir_all(&lproj).unwrap();
    fs::write(lproj.join("MainMenu.strings"), table).unwrap();

    // Not a property list, so mining falls back to raw byte extraction.
    let nib_dir = bundle.join("Resources/Base.lproj");
    fs::create_dir_all(&nib_dir).unwrap();
    fs::write(
        nib_dir.join("MainMenu.nib"),
        b"\x01\x0277.title\x00Bigger\x0377.other\x00x\x04",
    )
    .unwrap();
}

fn xliff_doc(lang: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file original="Example/Base.lproj/MainMenu.xib" source-language="en" target-language="{lang}" datatype="plaintext">
    <header/>
    <body>
      <trans-unit id="w0" xml:space="preserve">
        <source>Editor</source>
        <note>Class = "NSWindow"; title = "Editor"; ObjectID = "w0";</note>
      </trans-unit>
      <trans-unit id="1" xml:space="preserve">
        <source>Quit Editor</source>
        <note>Class = "NSMenuItem"; title = "Quit Editor"; ObjectID = "1";</note>
      </trans-unit>
      <trans-unit id="2" xml:space="preserve">
        <source>	Save</source>
      </trans-unit>
      <trans-unit id="3" xml:space="preserve">
        <source>Save</source>
        <target>stale translation</target>
      </trans-unit>
      <trans-unit id="9" xml:space="preserve">
        <source>Bigger</source>
      </trans-unit>
    </body>
  </file>
</xliff>
"#
    )
}

fn write_export(dir: &Path, langs: &[&str]) {
    for lang in langs {
        let inner = dir.join(format!("{lang}.xcloc")).join("Localized Contents");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join(format!("{lang}.xliff")), xliff_doc(lang)).unwrap();
    }
}

fn build_system(root: &Path) -> SystemDictionary {
    let menus = root.join("Menus.framework");
    write_strings_table(&menus, "fr", "MainMenu.strings", "Quitter %@", "Enregistrer");
    write_strings_table(&menus, "de", "MainMenu.strings", "%@ beenden", "Sichern");
    write_strings_table(&menus, "zh_CN", "MainMenu.strings", "退出%@", "存储");

    let helper = root.join("Helper.framework");
    write_helper_bundle(&helper);

    let menus_path = menus.to_str().unwrap().to_string();
    let helper_path = helper.to_str().unwrap().to_string();
    let nib_path = helper.join("Resources/Base.lproj/MainMenu.nib");

    SystemDictionary::from_catalog(&[
        SourceSpec {
            bundle: &menus_path,
            strings_file: "MainMenu.strings",
            nib: None,
        },
        SourceSpec {
            bundle: &helper_path,
            strings_file: "MainMenu.strings",
            nib: Some(NibSpec {
                path: nib_path.to_str().unwrap(),
                wanted: &["Bigger"],
            }),
        },
    ])
}

#[test]
fn test_full_translation_pass() {
    let root = tempfile::tempdir().unwrap();
    let system = build_system(root.path());
    assert_eq!(system.languages().len(), 3);

    let export = root.path().join("export");
    write_export(&export, &["en", "fr", "zh-Hans"]);

    let session = ExportSession::open(&system, &export).unwrap();
    assert_eq!(session.app_name(), "Editor");
    // Quit Editor, Save, Bigger - the tabbed Save counts once and the
    // window-name unit contributes no key.
    assert_eq!(session.target_key_count(), 3);
    // de sorts first: its Quit %@ and Save entries both match.
    assert_eq!(session.match_count(), 2);

    let report = session.translate_all().unwrap();
    assert_eq!(report.translated_files, 2);
    assert_eq!(report.skipped_files, 0);
    // fr fills 4 units (tabbed and plain Save both), zh-Hans fills 3.
    assert_eq!(report.replaced_units, 7);

    let fr = fs::read_to_string(export.join("fr.xcloc/Localized Contents/fr.xliff")).unwrap();
    assert!(fr.contains("<target>Quitter Editor</target>"));
    assert!(fr.contains("<target>\tEnregistrer</target>"));
    assert!(fr.contains("<target>Enregistrer</target>"));
    assert!(fr.contains("<target>Plus grand</target>"));
    assert!(!fr.contains("stale translation"));

    // Script-based locale falls back to the region-based dictionary key.
    let zh =
        fs::read_to_string(export.join("zh-Hans.xcloc/Localized Contents/zh-Hans.xliff")).unwrap();
    assert!(zh.contains("<target>退出Editor</target>"));
    assert!(zh.contains("<target>\t存储</target>"));

    // The reference document is never a translation target.
    let en = fs::read_to_string(export.join("en.xcloc/Localized Contents/en.xliff")).unwrap();
    assert_eq!(en, xliff_doc("en"));
}

#[test]
fn test_untouched_structure_round_trips() {
    let root = tempfile::tempdir().unwrap();
    let system = build_system(root.path());

    let export = root.path().join("export");
    write_export(&export, &["en", "de"]);

    let session = ExportSession::open(&system, &export).unwrap();
    session.translate_all().unwrap();

    let de = fs::read_to_string(export.join("de.xcloc/Localized Contents/de.xliff")).unwrap();
    // Everything except the rewritten targets survives byte for byte.
    assert!(de.contains(r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">"#));
    assert!(de.contains("<source>\tSave</source>"));
    assert!(de.contains(r#"<note>Class = "NSWindow"; title = "Editor"; ObjectID = "w0";</note>"#));
    assert!(de.contains("<target>\tSichern</target>"));
    // "Quit Editor" matches the placeholder entry "%@ beenden".
    assert!(de.contains("<target>Editor beenden</target>"));
}

#[test]
fn test_dictionary_reuse_across_sessions() {
    let root = tempfile::tempdir().unwrap();
    let system = build_system(root.path());

    let export_a = root.path().join("a");
    let export_b = root.path().join("b");
    write_export(&export_a, &["en", "fr"]);
    write_export(&export_b, &["en", "fr"]);

    let first = ExportSession::open(&system, &export_a).unwrap();
    first.translate_all().unwrap();

    // A later session sees the same read-only dictionary.
    let second = ExportSession::open(&system, &export_b).unwrap();
    assert_eq!(second.match_count(), first.match_count());
    second.translate_all().unwrap();
}

#[test]
fn test_missing_reference_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let system = SystemDictionary::default();

    let export = root.path().join("export");
    write_export(&export, &["fr"]);

    assert!(matches!(
        ExportSession::open(&system, &export),
        Err(Error::NoReferenceLanguage)
    ));
}
