//! LaTeX templates for the sticker sheet.
//!
//! The document template is plain text with `###NAME###` tokens. Layout
//! tokens are filled from [`SheetLayout`]; `###WORKS###` receives the
//! concatenated sticker fragments. Keeping the LaTeX here means the
//! renderer never has to escape braces in `format!` strings.

use crate::config::SheetLayout;
use std::path::Path;

/// Token replaced by the sticker fragments.
pub const WORKS_PLACEHOLDER: &str = "###WORKS###";

/// Document-level template: page geometry, fonts, and the `\sticker` macro.
///
/// `\sticker` arguments: 1 title, 2 artist, 3 code, 4 medium, 5 height,
/// 6 width, 7 price. Images are resolved as `<content>/<code>_img.jpg` and
/// `<content>/<code>_qr.jpg` relative to the compiler's working directory.
pub const DOCUMENT_TEMPLATE: &str = r"\documentclass{article}
\RequirePackage{graphicx}
\RequirePackage{geometry}
\RequirePackage{etoolbox}
\RequirePackage[most]{tcolorbox}
\RequirePackage{setspace}
\RequirePackage{fontspec}
\RequirePackage{xeCJK}
\setmainfont[Path = ###FONT_DIR###]{###FONT_FILE###}
\setCJKmainfont[Path = ###FONT_DIR###]{###FONT_FILE###}

\geometry{
	a4paper,
	landscape,
	margin=0in
}

\newcommand{\stickerwidth}{###STICKER_WIDTH###}
\newcommand{\stickerheight}{###STICKER_HEIGHT###}
\newcommand{\imagesize}{###IMAGE_SIZE###}
\newcommand{\qrsize}{###QR_SIZE###}

\newcommand{\artworkimage}[1]{\includegraphics[width=\imagesize,height=\imagesize,keepaspectratio]{###CONTENT_DIR###/#1_img.jpg}}
\newcommand{\artworkqr}[1]{\includegraphics[width=\qrsize]{###CONTENT_DIR###/#1_qr.jpg}}
\newcommand{\missingimage}[1]{\fbox{\parbox[c][\imagesize][c]{\imagesize}{\centering\tiny #1}}}
\newcommand{\missingqr}[1]{\fbox{\parbox[c][\qrsize][c]{\qrsize}{\centering\tiny #1}}}
% Swap the image macros for framed boxes within the current group.
\newcommand{\missingassets}{\let\artworkimage\missingimage\let\artworkqr\missingqr}

\newcommand{\sticker}[7] {
	% 1 title, 2 artist, 3 code, 4 medium, 5 height, 6 width, 7 price
	\begin{tcolorbox}[
		width=\stickerwidth,
		height=\stickerheight,
		colframe=white,
		colback=white,
		sharp corners,
		boxsep=0pt,
		left=0pt, right=0pt, bottom=0pt, top=0pt,
		boxrule=0pt,
		valign=top,
		halign=center]

		\vspace{4mm}
		\begin{minipage}[c][\imagesize]{\textwidth}
			\centering

			\artworkimage{#3}
		\end{minipage}

		\begin{minipage}[t][10mm]{\imagesize}
			\centering
			\vspace{5mm}
			#1
		\end{minipage}

		\begin{minipage}[b][35mm]{\imagesize}
			\centering
			#2

			\vspace{2mm}

			#4

			\vspace{2mm}

			#7 ###PRICE_SUFFIX###

			\vspace{3mm}
		\end{minipage}

		\begin{minipage}[b]{\textwidth}
			\centering
			\artworkqr{#3}
		\end{minipage}

		\vspace{1cm}
	\end{tcolorbox}
}

\begin{document}
	\pagestyle{empty}

\begin{flushleft}
	\begin{tcbitemize}[raster columns=###COLUMNS###,
					   raster equal height,
					   raster row skip=0mm,
					   raster column skip=0mm,
					   colback=white,
					   colframe=white,
					   size=tight,
					   boxrule=0pt,
					   boxsep=0pt,
					   halign=center,
					   valign=center]
###WORKS###
	\end{tcbitemize}
\end{flushleft}

\end{document}
";

/// Fill the layout tokens of [`DOCUMENT_TEMPLATE`], leaving `###WORKS###`.
pub fn document_template(layout: &SheetLayout, content_dir: &Path) -> String {
    let content = content_dir.to_string_lossy().replace('\\', "/");
    let content = content.trim_end_matches('/');

    DOCUMENT_TEMPLATE
        .replace("###FONT_DIR###", &layout.font_dir)
        .replace("###FONT_FILE###", &layout.font_file)
        .replace("###STICKER_WIDTH###", &mm(layout.sticker_width_mm))
        .replace("###STICKER_HEIGHT###", &mm(layout.sticker_height_mm))
        .replace("###IMAGE_SIZE###", &mm(layout.image_size_mm))
        .replace("###QR_SIZE###", &mm(layout.qr_size_mm))
        .replace("###CONTENT_DIR###", content)
        .replace("###PRICE_SUFFIX###", &layout.price_suffix)
        .replace("###COLUMNS###", &layout.columns.to_string())
}

fn mm(v: f32) -> String {
    format!("{v}mm")
}
