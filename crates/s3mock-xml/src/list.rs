//! The bucket listing document.

use std::io;

use quick_xml::Writer;
use quick_xml::events::BytesText;
use s3mock_model::BucketSummary;

use crate::write_declaration;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Format a bucket listing as XML, keeping the order of `buckets`.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Buckets><Bucket><Name>photos</Name></Bucket></Buckets></ListAllMyBucketsResult>
/// ```
#[must_use]
pub fn format_bucket_list(buckets: &[BucketSummary]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + buckets.len() * 48);
    if let Err(e) = write_bucket_list_xml(&mut buf, buckets) {
        tracing::error!(error = %e, "failed to serialize bucket listing XML");
        buf.clear();
    }
    buf
}

fn write_bucket_list_xml(buf: &mut Vec<u8>, buckets: &[BucketSummary]) -> io::Result<()> {
    let mut writer = Writer::new(buf);
    write_declaration(&mut writer)?;

    writer
        .create_element("ListAllMyBucketsResult")
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| {
            w.create_element("Buckets").write_inner_content(|w| {
                for bucket in buckets {
                    w.create_element("Bucket").write_inner_content(|w| {
                        w.create_element("Name")
                            .write_text_content(BytesText::new(&bucket.name))?;
                        Ok(())
                    })?;
                }
                Ok(())
            })?;
            Ok(())
        })?;

    Ok(())
}
