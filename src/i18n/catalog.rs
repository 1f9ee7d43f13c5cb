use super::Locale;

#[cfg(test)]
pub(super) const KEYS: &[&str] = &[
    "usage_header",
    "usage_examples",
    "usage_example_1",
    "usage_note",
    "video_info_title",
    "video_info_author",
    "video_info_duration",
    "chat_started_with_languages",
    "chat_exit_instruction",
    "chat_export_instruction",
    "chat_lang_instruction",
    "chat_goodbye",
    "chat_thinking",
    "summary_generating",
    "error_general",
    "error_export",
    "export_empty",
    "export_prompt_format",
    "export_prompt_filename",
    "export_writing",
    "export_success",
    "lang_current",
    "lang_prompt",
    "lang_changed",
    "lang_unchanged",
    "lang_invalid",
];

pub(super) fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    match locale {
        Locale::En => english(key),
        Locale::Es => spanish(key),
        Locale::Fr => french(key),
    }
}

fn english(key: &str) -> Option<&'static str> {
    let msg = match key {
        "usage_header" => "Usage: tubechat <video-url> [options]",
        "usage_examples" => "Examples:",
        "usage_example_1" => {
            "  tubechat https://www.youtube.com/watch?v=dQw4w9WgXcQ --transcript transcript.txt"
        }
        "usage_note" => "Run `tubechat --help` for every option.",
        "video_info_title" => "Title: {title}",
        "video_info_author" => "Author: {author}",
        "video_info_duration" => "Duration: {duration}",
        "chat_started_with_languages" => {
            "Chat started (interface: {ui_language}, transcript: {transcript_language})"
        }
        "chat_exit_instruction" => "Type 'exit' or 'quit' to end the session.",
        "chat_export_instruction" => "Type '/export' to save the conversation.",
        "chat_lang_instruction" => "Type '/lang' to change the interface language.",
        "chat_goodbye" => "Goodbye!",
        "chat_thinking" => "Thinking...",
        "summary_generating" => "Generating summary...",
        "error_general" => "Error: {error}",
        "error_export" => "Export failed: {error}",
        "export_empty" => "Nothing to export yet.",
        "export_prompt_format" => "Export format [1] Markdown  [2] JSON (default 1): ",
        "export_prompt_filename" => "File name (default {default}): ",
        "export_writing" => "Writing export...",
        "export_success" => "Conversation exported to {path}",
        "lang_current" => "Current language: {language}",
        "lang_prompt" => "Choose a language (number or code, blank to keep): ",
        "lang_changed" => "Language changed to {language}.",
        "lang_unchanged" => "Language unchanged.",
        "lang_invalid" => "Unknown language: {input}",
        _ => return None,
    };
    Some(msg)
}

fn spanish(key: &str) -> Option<&'static str> {
    let msg = match key {
        "usage_header" => "Uso: tubechat <url-del-video> [opciones]",
        "usage_examples" => "Ejemplos:",
        "usage_example_1" => {
            "  tubechat https://www.youtube.com/watch?v=dQw4w9WgXcQ --transcript transcripcion.txt"
        }
        "usage_note" => "Ejecuta `tubechat --help` para ver todas las opciones.",
        "video_info_title" => "Título: {title}",
        "video_info_author" => "Autor: {author}",
        "video_info_duration" => "Duración: {duration}",
        "chat_started_with_languages" => {
            "Chat iniciado (interfaz: {ui_language}, transcripción: {transcript_language})"
        }
        "chat_exit_instruction" => "Escribe 'exit' o 'quit' para terminar la sesión.",
        "chat_export_instruction" => "Escribe '/export' para guardar la conversación.",
        "chat_lang_instruction" => "Escribe '/lang' para cambiar el idioma de la interfaz.",
        "chat_goodbye" => "¡Hasta luego!",
        "chat_thinking" => "Pensando...",
        "summary_generating" => "Generando resumen...",
        "error_general" => "Error: {error}",
        "error_export" => "La exportación falló: {error}",
        "export_empty" => "Todavía no hay nada que exportar.",
        "export_prompt_format" => "Formato [1] Markdown  [2] JSON (por defecto 1): ",
        "export_prompt_filename" => "Nombre del archivo (por defecto {default}): ",
        "export_writing" => "Escribiendo exportación...",
        "export_success" => "Conversación exportada a {path}",
        "lang_current" => "Idioma actual: {language}",
        "lang_prompt" => "Elige un idioma (número o código, vacío para mantener): ",
        "lang_changed" => "Idioma cambiado a {language}.",
        "lang_unchanged" => "Idioma sin cambios.",
        "lang_invalid" => "Idioma desconocido: {input}",
        _ => return None,
    };
    Some(msg)
}

fn french(key: &str) -> Option<&'static str> {
    let msg = match key {
        "usage_header" => "Utilisation : tubechat <url-de-la-video> [options]",
        "usage_examples" => "Exemples :",
        "usage_example_1" => {
            "  tubechat https://www.youtube.com/watch?v=dQw4w9WgXcQ --transcript transcription.txt"
        }
        "usage_note" => "Lancez `tubechat --help` pour voir toutes les options.",
        "video_info_title" => "Titre : {title}",
        "video_info_author" => "Auteur : {author}",
        "video_info_duration" => "Durée : {duration}",
        "chat_started_with_languages" => {
            "Discussion démarrée (interface : {ui_language}, transcription : {transcript_language})"
        }
        "chat_exit_instruction" => "Tapez 'exit' ou 'quit' pour terminer la session.",
        "chat_export_instruction" => "Tapez '/export' pour enregistrer la conversation.",
        "chat_lang_instruction" => "Tapez '/lang' pour changer la langue de l'interface.",
        "chat_goodbye" => "Au revoir !",
        "chat_thinking" => "Réflexion...",
        "summary_generating" => "Génération du résumé...",
        "error_general" => "Erreur : {error}",
        "error_export" => "Échec de l'export : {error}",
        "export_empty" => "Rien à exporter pour l'instant.",
        "export_prompt_format" => "Format [1] Markdown  [2] JSON (1 par défaut) : ",
        "export_prompt_filename" => "Nom du fichier ({default} par défaut) : ",
        "export_writing" => "Écriture de l'export...",
        "export_success" => "Conversation exportée vers {path}",
        "lang_current" => "Langue actuelle : {language}",
        "lang_prompt" => "Choisissez une langue (numéro ou code, vide pour garder) : ",
        "lang_changed" => "Langue changée en {language}.",
        "lang_unchanged" => "Langue inchangée.",
        "lang_invalid" => "Langue inconnue : {input}",
        _ => return None,
    };
    Some(msg)
}
