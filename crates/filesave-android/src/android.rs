use filesave_engine::platform::android::AndroidContext;
use filesave_engine::{FileSaver, Platform, SaveError, SaveOutcome, WriterConfig};
use jni::JNIEnv;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean};

const LOG_TAG: &str = "FileSave";

/// Route `log` output to logcat. Safe to call more than once.
pub fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(LOG_TAG),
    );
}

/// Save using the context registered with `ndk-context`.
pub fn save_with_ndk_context(
    config: WriterConfig,
    directory: &str,
    filename: &str,
    content: &str,
) -> Result<SaveOutcome, SaveError> {
    let context = AndroidContext::from_ndk_context()?;
    FileSaver::new(config).save(Some(&context), directory, filename, content)
}

/// `filesave.FileUtils.saveFile`. Returns whether the file was written; failures are logged.
#[unsafe(no_mangle)]
pub extern "system" fn Java_filesave_FileUtils_saveFile<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    context: JObject<'local>,
    path: JString<'local>,
    filename: JString<'local>,
    content: JString<'local>,
    external: jboolean,
) -> jboolean {
    init_logging();

    let config = WriterConfig {
        external_mode: external != JNI_FALSE,
        ..WriterConfig::default()
    };

    match save_from_java(&mut env, &context, &path, &filename, &content, config) {
        Ok(SaveOutcome::File(path)) => {
            log::info!("Saved {}", path.display());
            JNI_TRUE
        }
        Ok(SaveOutcome::Content(uri)) => {
            log::info!("Saved {uri}");
            JNI_TRUE
        }
        Err(e) => {
            log::error!("Failed to save file: {e}");
            JNI_FALSE
        }
    }
}

fn save_from_java(
    env: &mut JNIEnv,
    context: &JObject,
    path: &JString,
    filename: &JString,
    content: &JString,
    config: WriterConfig,
) -> Result<SaveOutcome, SaveError> {
    if context.is_null() {
        return Err(SaveError::MissingContext);
    }
    let directory = read_string(env, path)?;
    let filename = read_string(env, filename)?;
    let content = read_string(env, content)?;

    let context = AndroidContext::new(env, context)?;
    let platform = if context.has_platform_marker() {
        Platform::Mobile
    } else {
        Platform::Desktop
    };

    FileSaver::with_platform(config, platform).save(
        Some(&context),
        &directory,
        &filename,
        &content,
    )
}

/// Read a Java string argument; `null` reads as empty.
fn read_string(env: &mut JNIEnv, value: &JString) -> Result<String, SaveError> {
    if value.is_null() {
        return Ok(String::new());
    }
    env.get_string(value)
        .map(Into::into)
        .map_err(|e| SaveError::platform_query("string argument", e))
}
