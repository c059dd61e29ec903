//! Android implementation of [`PlatformContext`] using JNI.
//!
//! Every call attaches to the VM, runs inside a local frame and, if Java threw,
//! logs and clears the exception before reporting the failure.

use crate::context::{ContentResolver, ContentUri, PlatformContext};
use crate::error::SaveError;
use crate::media::MediaRecord;
use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};
use std::io;
use std::path::PathBuf;

/// A handle on the Android application context.
pub struct AndroidContext {
    vm: JavaVM,
    context: GlobalRef,
}

impl AndroidContext {
    /// Wrap a context passed into a JNI call.
    pub fn new(env: &JNIEnv, context: &JObject) -> Result<Self, SaveError> {
        let vm = env
            .get_java_vm()
            .map_err(|e| SaveError::platform_query("java vm", e))?;
        let context = env
            .new_global_ref(context)
            .map_err(|e| SaveError::platform_query("application context", e))?;
        Ok(Self { vm, context })
    }

    /// Use the VM and context registered with `ndk-context` (native activities).
    pub fn from_ndk_context() -> Result<Self, SaveError> {
        let ctx = ndk_context::android_context();
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
            .map_err(|e| SaveError::platform_query("java vm", e))?;
        let context = {
            let env = vm
                .attach_current_thread()
                .map_err(|e| SaveError::platform_query("java vm", e))?;
            let context = unsafe { JObject::from_raw(ctx.context().cast()) };
            env.new_global_ref(&context)
                .map_err(|e| SaveError::platform_query("application context", e))?
        };
        Ok(Self { vm, context })
    }

    /// Whether the `android.os.Build` class can be loaded. Any failure reads as "no".
    pub fn has_platform_marker(&self) -> bool {
        self.with_env("android.os.Build", |env| {
            env.find_class("android/os/Build")?;
            Ok(())
        })
        .is_ok()
    }

    fn with_env<F, T>(&self, capability: &'static str, f: F) -> Result<T, SaveError>
    where
        F: FnOnce(&mut JNIEnv) -> Result<T, jni::errors::Error>,
    {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| SaveError::platform_query(capability, e))?;

        env.with_local_frame(16, |env| f(env)).map_err(|e| {
            clear_exception(&mut env);
            log::error!("JNI error querying {capability}: {e}");
            SaveError::platform_query(capability, e)
        })
    }

    fn resolver<'local>(
        &self,
        env: &mut JNIEnv<'local>,
    ) -> Result<JObject<'local>, jni::errors::Error> {
        env.call_method(
            self.context.as_obj(),
            "getContentResolver",
            "()Landroid/content/ContentResolver;",
            &[],
        )?
        .l()
    }
}

impl PlatformContext for AndroidContext {
    fn files_dir(&self) -> Result<PathBuf, SaveError> {
        self.with_env("files dir", |env| {
            let dir = env
                .call_method(self.context.as_obj(), "getFilesDir", "()Ljava/io/File;", &[])?
                .l()?;
            absolute_path(env, &dir)
        })
    }

    fn external_storage_dir(&self) -> Result<PathBuf, SaveError> {
        self.with_env("external storage dir", |env| {
            let environment = env.find_class("android/os/Environment")?;
            let dir = env
                .call_static_method(
                    environment,
                    "getExternalStorageDirectory",
                    "()Ljava/io/File;",
                    &[],
                )?
                .l()?;
            absolute_path(env, &dir)
        })
    }

    fn sdk_version(&self) -> Option<i32> {
        let sdk = self
            .with_env("sdk version", |env| {
                let build_version = env.find_class("android/os/Build$VERSION")?;
                env.get_static_field(build_version, "SDK_INT", "I")?.i()
            })
            .ok()?;
        log::debug!("Android SDK version: {sdk}");
        Some(sdk)
    }

    fn content_resolver(&self) -> Result<&dyn ContentResolver, SaveError> {
        Ok(self)
    }
}

impl ContentResolver for AndroidContext {
    fn insert(&self, volume: &str, record: &MediaRecord) -> Result<Option<ContentUri>, SaveError> {
        self.with_env("media store insert", |env| {
            let values = env.new_object("android/content/ContentValues", "()V", &[])?;
            for (column, value) in record.columns() {
                let column = env.new_string(column)?;
                let value = env.new_string(value)?;
                env.call_method(
                    &values,
                    "put",
                    "(Ljava/lang/String;Ljava/lang/String;)V",
                    &[JValue::Object(&column), JValue::Object(&value)],
                )?;
            }

            let volume = env.new_string(volume)?;
            let files = env.find_class("android/provider/MediaStore$Files")?;
            let collection = env
                .call_static_method(
                    files,
                    "getContentUri",
                    "(Ljava/lang/String;)Landroid/net/Uri;",
                    &[JValue::Object(&volume)],
                )?
                .l()?;

            let resolver = self.resolver(env)?;
            let uri = env
                .call_method(
                    &resolver,
                    "insert",
                    "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                    &[JValue::Object(&collection), JValue::Object(&values)],
                )?
                .l()?;
            if uri.is_null() {
                return Ok(None);
            }

            let uri = env
                .call_method(&uri, "toString", "()Ljava/lang/String;", &[])?
                .l()?;
            Ok(Some(ContentUri::new(java_string(env, uri)?)))
        })
    }

    fn open_output_stream(
        &self,
        uri: &ContentUri,
    ) -> Result<Option<Box<dyn io::Write + '_>>, SaveError> {
        let stream = self.with_env("output stream", |env| {
            let uri_string = env.new_string(uri.as_str())?;
            let uri = env
                .call_static_method(
                    "android/net/Uri",
                    "parse",
                    "(Ljava/lang/String;)Landroid/net/Uri;",
                    &[JValue::Object(&uri_string)],
                )?
                .l()?;

            let resolver = self.resolver(env)?;
            let stream = env
                .call_method(
                    &resolver,
                    "openOutputStream",
                    "(Landroid/net/Uri;)Ljava/io/OutputStream;",
                    &[JValue::Object(&uri)],
                )?
                .l()?;
            if stream.is_null() {
                return Ok(None);
            }
            env.new_global_ref(&stream).map(Some)
        })?;

        Ok(stream.map(|stream| {
            Box::new(JavaOutputStream {
                vm: &self.vm,
                stream,
            }) as Box<dyn io::Write + '_>
        }))
    }
}

/// A `java.io.OutputStream` seen as [`io::Write`]. Closed on drop.
struct JavaOutputStream<'a> {
    vm: &'a JavaVM,
    stream: GlobalRef,
}

impl JavaOutputStream<'_> {
    fn call(
        &self,
        f: impl FnOnce(&mut JNIEnv) -> Result<(), jni::errors::Error>,
    ) -> io::Result<()> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| io::Error::other(e.to_string()))?;
        env.with_local_frame(4, |env| f(env)).map_err(|e| {
            clear_exception(&mut env);
            io::Error::other(e.to_string())
        })
    }
}

impl io::Write for JavaOutputStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.call(|env| {
            let bytes = env.byte_array_from_slice(buf)?;
            env.call_method(
                self.stream.as_obj(),
                "write",
                "([B)V",
                &[JValue::Object(&bytes)],
            )?;
            Ok(())
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.call(|env| {
            env.call_method(self.stream.as_obj(), "flush", "()V", &[])?;
            Ok(())
        })
    }
}

impl Drop for JavaOutputStream<'_> {
    fn drop(&mut self) {
        let closed = self.call(|env| {
            env.call_method(self.stream.as_obj(), "close", "()V", &[])?;
            Ok(())
        });
        if let Err(e) = closed {
            log::warn!("Failed to close output stream: {e}");
        }
    }
}

fn absolute_path(env: &mut JNIEnv, file: &JObject) -> Result<PathBuf, jni::errors::Error> {
    let path = env
        .call_method(file, "getAbsolutePath", "()Ljava/lang/String;", &[])?
        .l()?;
    Ok(PathBuf::from(java_string(env, path)?))
}

fn java_string(env: &mut JNIEnv, value: JObject) -> Result<String, jni::errors::Error> {
    let value = JString::from(value);
    Ok(env.get_string(&value)?.into())
}

/// Print and clear a pending Java exception so later JNI calls can proceed.
fn clear_exception(env: &mut JNIEnv) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}
