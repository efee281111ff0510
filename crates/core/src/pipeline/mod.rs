pub mod analyze_image_use_case;
